//! Cell center physics
//!
//! A center is a point with a velocity. It is pushed around by pokes, bounces
//! off the image borders, and slows down through friction until it rests.

use glam::DVec2;

/// Per-tick motion constants, derived from [`SoapConfig`](crate::SoapConfig)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Speed limit, also the width of the reflective border margin
    pub max_velocity: f64,
    /// Velocity multiplier applied once per tick
    pub friction: f64,
    /// Velocity components below this magnitude are zeroed
    pub jitter_epsilon: f64,
}

/// A single moving cell center
///
/// # Invariants
///
/// - `|velocity| <= max_velocity` after every [`apply_impulse`](Self::apply_impulse)
/// - `position` stays inside `[0, W) × [0, H)` after every [`tick`](Self::tick)
///   that starts inside the bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterBody {
    position: DVec2,
    velocity: DVec2,
}

impl CenterBody {
    /// Create a center at rest
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
        }
    }

    /// Current position, in pixel coordinates
    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Current velocity, in pixels per tick
    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Current speed
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Whether the center has come to a complete stop
    #[inline]
    pub fn at_rest(&self) -> bool {
        self.velocity == DVec2::ZERO
    }

    /// Add `delta` to the velocity, then scale it back down to `max_velocity`
    ///
    /// Direction is preserved; a velocity already inside the limit is left as is.
    ///
    /// # Example
    ///
    /// ```
    /// use soap_cells::{CenterBody, DVec2};
    ///
    /// let mut center = CenterBody::new(DVec2::new(50.0, 50.0));
    /// center.apply_impulse(DVec2::new(300.0, 400.0), 15.0);
    /// assert!((center.speed() - 15.0).abs() < 1e-9);
    /// assert!((center.velocity().x - 9.0).abs() < 1e-9);
    /// ```
    pub fn apply_impulse(&mut self, delta: DVec2, max_velocity: f64) {
        self.velocity = (self.velocity + delta).clamp_length_max(max_velocity);
    }

    /// Advance the center by one tick inside `bounds`
    ///
    /// 1. Flip each velocity component whose axis is within `max_velocity` of a border
    /// 2. Move by the velocity
    /// 3. Wrap the position back into the bounds
    /// 4. Apply friction
    /// 5. Zero components below the jitter cutoff
    pub fn tick(&mut self, bounds: DVec2, params: &MotionParams) {
        let margin = params.max_velocity;
        self.velocity.x = reflect(self.position.x, self.velocity.x, bounds.x, margin);
        self.velocity.y = reflect(self.position.y, self.velocity.y, bounds.y, margin);

        self.position += self.velocity;
        self.position = DVec2::new(
            wrap(self.position.x, bounds.x),
            wrap(self.position.y, bounds.y),
        );

        self.velocity *= params.friction;
        self.velocity.x = snap(self.velocity.x, params.jitter_epsilon);
        self.velocity.y = snap(self.velocity.y, params.jitter_epsilon);
    }
}

/// Negate a velocity component when its axis is inside the border margin
#[inline]
fn reflect(position: f64, velocity: f64, bound: f64, margin: f64) -> f64 {
    if position < margin || position > bound - margin {
        -velocity
    } else {
        velocity
    }
}

/// Floor-modulo into `[0, bound)`
///
/// `rem_euclid` can round up to exactly `bound` for tiny negative inputs.
#[inline]
fn wrap(value: f64, bound: f64) -> f64 {
    let wrapped = value.rem_euclid(bound);
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}

#[inline]
fn snap(component: f64, epsilon: f64) -> f64 {
    if component.abs() < epsilon {
        0.0
    } else {
        component
    }
}
