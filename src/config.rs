//! Simulation configuration and builder
//!
//! Every tunable constant of the simulation lives here. Configurations are
//! validated once, at build time, so the physics code never has to re-check them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::center::MotionParams;
use crate::decomposition::{DecompositionMode, RegionPolicy};
use crate::error::{Result, SoapError};
use crate::sampler::Rgb;

/// Default number of cell centers
pub const DEFAULT_CELL_COUNT: usize = 500;
/// Default speed limit for a center, in pixels per tick
pub const DEFAULT_MAX_VELOCITY: f64 = 15.0;
/// Default multiplicative velocity decay per tick
pub const DEFAULT_FRICTION: f64 = 0.97;
/// Default poke constant `K` in `diff * K / distance^3`
pub const DEFAULT_POKE_STRENGTH: f64 = 100_000.0;
/// Default threshold below which a velocity component snaps to zero
pub const DEFAULT_JITTER_EPSILON: f64 = 0.01;
/// Default frame background
pub const DEFAULT_BACKGROUND: Rgb = [63, 63, 63];

/// Configuration for a cell simulation
///
/// The same configuration (and the same bounds) always produces the same
/// initial center layout, because placement is driven by `seed`.
///
/// # Example
///
/// ```rust
/// use soap_cells::*;
///
/// let config = SoapConfigBuilder::new()
///     .seed(7)
///     .cell_count(200).unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.cell_count, 200);
/// assert_eq!(config.max_velocity, 15.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoapConfig {
    /// Seed for center placement on reset
    pub seed: u64,

    /// Number of centers (and therefore of Voronoi cells)
    pub cell_count: usize,

    /// Upper bound on the norm of any center velocity
    ///
    /// Also used as the width of the reflective margin along each border.
    pub max_velocity: f64,

    /// Velocity multiplier applied after every tick, in `(0, 1]`
    pub friction: f64,

    /// Poke constant; larger values push centers further
    pub poke_strength: f64,

    /// Velocity components smaller than this are zeroed after every tick
    pub jitter_epsilon: f64,

    /// Color every frame is cleared to before polygons are drawn
    pub background: Rgb,

    /// Decomposition shown on the first frame
    pub initial_mode: DecompositionMode,

    /// How open (unbounded) Voronoi cells are handled
    pub region_policy: RegionPolicy,
}

impl SoapConfig {
    /// Per-tick motion constants shared by every center
    #[inline]
    pub fn motion(&self) -> MotionParams {
        MotionParams {
            max_velocity: self.max_velocity,
            friction: self.friction,
            jitter_epsilon: self.jitter_epsilon,
        }
    }
}

impl Default for SoapConfig {
    fn default() -> Self {
        SoapConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating SoapConfig with validation
///
/// # Example
///
/// ```rust
/// use soap_cells::*;
///
/// let config = SoapConfigBuilder::new()
///     .seed(12345)
///     .friction(0.9)
///     .unwrap()
///     .region_policy(RegionPolicy::ClipToBounds)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.friction, 0.9);
/// ```
#[derive(Debug, Clone)]
pub struct SoapConfigBuilder {
    seed: Option<u64>,
    cell_count: usize,
    max_velocity: f64,
    friction: f64,
    poke_strength: f64,
    jitter_epsilon: f64,
    background: Rgb,
    initial_mode: DecompositionMode,
    region_policy: RegionPolicy,
}

impl SoapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (drawn at build time)
    /// - cell_count: 500
    /// - max_velocity: 15
    /// - friction: 0.97
    /// - poke_strength: 100000
    /// - jitter_epsilon: 0.01
    /// - background: (63, 63, 63)
    /// - initial_mode: Voronoi
    /// - region_policy: DropOpen
    pub fn new() -> Self {
        Self {
            seed: None,
            cell_count: DEFAULT_CELL_COUNT,
            max_velocity: DEFAULT_MAX_VELOCITY,
            friction: DEFAULT_FRICTION,
            poke_strength: DEFAULT_POKE_STRENGTH,
            jitter_epsilon: DEFAULT_JITTER_EPSILON,
            background: DEFAULT_BACKGROUND,
            initial_mode: DecompositionMode::default(),
            region_policy: RegionPolicy::default(),
        }
    }

    /// Set the placement seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of centers
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is zero
    pub fn cell_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(SoapError::InvalidConfig(
                "cell count must be at least 1".to_string(),
            ));
        }
        self.cell_count = count;
        Ok(self)
    }

    /// Set the maximum center speed
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_velocity` is not a positive finite number
    pub fn max_velocity(mut self, max_velocity: f64) -> Result<Self> {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return Err(SoapError::InvalidConfig(format!(
                "max velocity must be positive (got {})",
                max_velocity
            )));
        }
        self.max_velocity = max_velocity;
        Ok(self)
    }

    /// Set the per-tick friction multiplier
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `friction` is outside `(0, 1]`
    pub fn friction(mut self, friction: f64) -> Result<Self> {
        if !(friction > 0.0 && friction <= 1.0) {
            return Err(SoapError::InvalidConfig(format!(
                "friction must be in (0, 1] (got {})",
                friction
            )));
        }
        self.friction = friction;
        Ok(self)
    }

    /// Set the poke constant
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `strength` is negative or not finite
    pub fn poke_strength(mut self, strength: f64) -> Result<Self> {
        if !strength.is_finite() || strength < 0.0 {
            return Err(SoapError::InvalidConfig(format!(
                "poke strength must be >= 0 (got {})",
                strength
            )));
        }
        self.poke_strength = strength;
        Ok(self)
    }

    /// Set the jitter cutoff
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `epsilon` is negative or not finite
    pub fn jitter_epsilon(mut self, epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(SoapError::InvalidConfig(format!(
                "jitter epsilon must be >= 0 (got {})",
                epsilon
            )));
        }
        self.jitter_epsilon = epsilon;
        Ok(self)
    }

    /// Set the frame background color
    pub fn background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Set the decomposition shown first
    pub fn initial_mode(mut self, mode: DecompositionMode) -> Self {
        self.initial_mode = mode;
        self
    }

    /// Set how open Voronoi cells are treated
    pub fn region_policy(mut self, policy: RegionPolicy) -> Self {
        self.region_policy = policy;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, draws one from the thread RNG.
    pub fn build(self) -> Result<SoapConfig> {
        Ok(self.build_unchecked())
    }

    // Setters already validated every field.
    fn build_unchecked(self) -> SoapConfig {
        SoapConfig {
            seed: self.seed.unwrap_or_else(|| rand::random()),
            cell_count: self.cell_count,
            max_velocity: self.max_velocity,
            friction: self.friction,
            poke_strength: self.poke_strength,
            jitter_epsilon: self.jitter_epsilon,
            background: self.background,
            initial_mode: self.initial_mode,
            region_policy: self.region_policy,
        }
    }
}

impl Default for SoapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SoapConfigBuilder::new().build().unwrap();
        assert_eq!(config.cell_count, 500);
        assert_eq!(config.max_velocity, 15.0);
        assert_eq!(config.friction, 0.97);
        assert_eq!(config.poke_strength, 100_000.0);
        assert_eq!(config.jitter_epsilon, 0.01);
        assert_eq!(config.background, [63, 63, 63]);
        assert_eq!(config.initial_mode, DecompositionMode::Voronoi);
        assert_eq!(config.region_policy, RegionPolicy::DropOpen);
    }

    #[test]
    fn test_builder_custom() {
        let config = SoapConfigBuilder::new()
            .seed(42)
            .cell_count(4)
            .unwrap()
            .max_velocity(5.0)
            .unwrap()
            .initial_mode(DecompositionMode::Delaunay)
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.cell_count, 4);
        assert_eq!(config.max_velocity, 5.0);
        assert_eq!(config.initial_mode, DecompositionMode::Delaunay);
    }

    #[test]
    fn test_motion_params_follow_config() {
        let config = SoapConfigBuilder::new()
            .seed(1)
            .jitter_epsilon(0.5)
            .unwrap()
            .build()
            .unwrap();
        let motion = config.motion();
        assert_eq!(motion.max_velocity, config.max_velocity);
        assert_eq!(motion.friction, config.friction);
        assert_eq!(motion.jitter_epsilon, 0.5);
    }

    #[test]
    fn test_builder_rejects_zero_cells() {
        assert!(SoapConfigBuilder::new().cell_count(0).is_err());
    }

    #[test]
    fn test_builder_rejects_bad_friction() {
        assert!(SoapConfigBuilder::new().friction(0.0).is_err());
        assert!(SoapConfigBuilder::new().friction(1.5).is_err());
        assert!(SoapConfigBuilder::new().friction(f64::NAN).is_err());
        assert!(SoapConfigBuilder::new().friction(1.0).is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_velocity() {
        assert!(SoapConfigBuilder::new().max_velocity(0.0).is_err());
        assert!(SoapConfigBuilder::new().max_velocity(-3.0).is_err());
        assert!(SoapConfigBuilder::new().max_velocity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_builder_rejects_negative_constants() {
        assert!(SoapConfigBuilder::new().poke_strength(-1.0).is_err());
        assert!(SoapConfigBuilder::new().jitter_epsilon(-0.1).is_err());
    }

    #[test]
    fn test_default_config_is_seeded() {
        assert_eq!(SoapConfig::default().seed, 0);
        assert_eq!(SoapConfig::default(), SoapConfig::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = SoapConfigBuilder::new()
            .seed(12345)
            .region_policy(RegionPolicy::ClipToBounds)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: SoapConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
