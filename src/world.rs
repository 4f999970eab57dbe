//! SimulationWorld: the set of moving centers

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::center::CenterBody;
use crate::config::SoapConfig;
use crate::decomposition::DecompositionMode;
use crate::error::{Result, SoapError};
use crate::input::Command;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Largest impulse magnitude a poke can produce
///
/// Anything this large saturates at `max_velocity` anyway; the cap keeps a
/// poke a hair's breadth from a center finite.
const IMPULSE_CEILING: f64 = 1e12;

/// All cell centers plus the current decomposition mode
///
/// The world exclusively owns its centers. Other components only ever see a
/// by-value snapshot from [`positions`](Self::positions).
///
/// # Examples
///
/// ```
/// use soap_cells::*;
///
/// let config = SoapConfigBuilder::new()
///     .seed(42)
///     .cell_count(100).unwrap()
///     .build().unwrap();
///
/// let mut world = SimulationWorld::new(config, DVec2::new(320.0, 240.0)).unwrap();
/// world.poke(DVec2::new(160.0, 120.0));
/// world.advance();
///
/// assert_eq!(world.center_count(), 100);
/// assert!(world.centers().iter().all(|c| c.speed() <= 15.0 + 1e-9));
/// ```
#[derive(Debug, Clone)]
pub struct SimulationWorld {
    /// Configuration the world was built with
    config: SoapConfig,

    /// Simulation extent `(W, H)`; positions live in `[0, W) × [0, H)`
    bounds: DVec2,

    /// Centers, in stable index order
    centers: Vec<CenterBody>,

    /// Decomposition currently displayed
    mode: DecompositionMode,

    /// Placement RNG, seeded from the config so resets are reproducible
    rng: ChaCha8Rng,

    /// Ticks advanced since construction
    ticks: u64,
}

impl SimulationWorld {
    /// Create a world with `config.cell_count` randomly placed centers
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either bound is not a positive finite number.
    pub fn new(config: SoapConfig, bounds: DVec2) -> Result<Self> {
        validate_bounds(bounds)?;

        let mut world = Self {
            config,
            bounds,
            centers: Vec::new(),
            mode: config.initial_mode,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ticks: 0,
        };
        world.reset();
        Ok(world)
    }

    /// Create a world with centers at rest at the given positions
    ///
    /// The world's cell count becomes `positions.len()`, so later resets keep
    /// that cardinality.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for invalid bounds or an empty position list,
    /// and `CenterOutOfBounds` for any position outside `[0, W) × [0, H)`.
    pub fn with_positions(config: SoapConfig, bounds: DVec2, positions: &[DVec2]) -> Result<Self> {
        validate_bounds(bounds)?;
        if positions.is_empty() {
            return Err(SoapError::InvalidConfig(
                "at least one center position is required".to_string(),
            ));
        }
        if let Some((index, p)) = positions
            .iter()
            .enumerate()
            .find(|(_, p)| !contains(bounds, **p))
        {
            return Err(SoapError::CenterOutOfBounds { index, x: p.x, y: p.y });
        }

        let config = SoapConfig {
            cell_count: positions.len(),
            ..config
        };
        Ok(Self {
            config,
            bounds,
            centers: positions.iter().map(|&p| CenterBody::new(p)).collect(),
            mode: config.initial_mode,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ticks: 0,
        })
    }

    /// Replace every center with a fresh one at rest at a random position
    pub fn reset(&mut self) {
        let bounds = self.bounds;
        let rng = &mut self.rng;
        self.centers = (0..self.config.cell_count)
            .map(|_| {
                CenterBody::new(DVec2::new(
                    rng.gen_range(0.0..bounds.x),
                    rng.gen_range(0.0..bounds.y),
                ))
            })
            .collect();
        tracing::info!(centers = self.centers.len(), "centers reset");
    }

    /// Push every center away from `target`
    ///
    /// A center at distance `d > 0` receives `diff * K / d³`; a center sitting
    /// exactly on `target` receives nothing.
    pub fn poke(&mut self, target: DVec2) {
        let strength = self.config.poke_strength;
        let max_velocity = self.config.max_velocity;
        for center in &mut self.centers {
            center.apply_impulse(poke_impulse(center.position(), target, strength), max_velocity);
        }
        tracing::debug!(x = target.x, y = target.y, "poke");
    }

    /// Move every center by one tick
    pub fn advance(&mut self) {
        let motion = self.config.motion();
        for center in &mut self.centers {
            center.tick(self.bounds, &motion);
        }
        self.ticks += 1;
    }

    /// Switch between Voronoi and Delaunay
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        tracing::debug!(mode = self.mode.name(), "mode toggled");
    }

    /// Apply a user command; returns `false` once the loop should stop
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Reset => self.reset(),
            Command::ToggleMode => self.toggle_mode(),
            Command::Poke(target) => self.poke(target),
        }
        true
    }

    /// Current decomposition mode
    #[inline]
    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    /// Force a decomposition mode
    #[inline]
    pub fn set_mode(&mut self, mode: DecompositionMode) {
        self.mode = mode;
    }

    /// Configuration in effect
    #[inline]
    pub fn config(&self) -> &SoapConfig {
        &self.config
    }

    /// Simulation extent `(W, H)`
    #[inline]
    pub fn bounds(&self) -> DVec2 {
        self.bounds
    }

    /// All centers
    #[inline]
    pub fn centers(&self) -> &[CenterBody] {
        &self.centers
    }

    /// Number of centers
    #[inline]
    pub fn center_count(&self) -> usize {
        self.centers.len()
    }

    /// Ticks advanced so far
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Snapshot of every center position, in index order
    pub fn positions(&self) -> Vec<DVec2> {
        self.centers.iter().map(CenterBody::position).collect()
    }

    /// Total kinetic energy, `Σ |v|² / 2` with unit mass
    pub fn kinetic_energy(&self) -> f64 {
        self.centers
            .iter()
            .map(|c| c.velocity().length_squared() * 0.5)
            .sum()
    }

    /// Index of the center whose cell contains `point` (requires spatial-index feature)
    ///
    /// Builds a KD-tree over the current positions.
    #[cfg(feature = "spatial-index")]
    pub fn find_center_at(&self, point: DVec2) -> Option<usize> {
        SpatialIndex::new(&self.positions()).find_nearest(point)
    }
}

/// Impulse a poke at `target` gives a center at `position`
pub fn poke_impulse(position: DVec2, target: DVec2, strength: f64) -> DVec2 {
    let diff = position - target;
    let distance = diff.length();
    if distance == 0.0 {
        return DVec2::ZERO;
    }
    let magnitude = (strength / (distance * distance)).min(IMPULSE_CEILING);
    diff / distance * magnitude
}

fn validate_bounds(bounds: DVec2) -> Result<()> {
    if !bounds.is_finite() || bounds.x <= 0.0 || bounds.y <= 0.0 {
        return Err(SoapError::InvalidConfig(format!(
            "bounds must be positive (got {} x {})",
            bounds.x, bounds.y
        )));
    }
    Ok(())
}

#[inline]
fn contains(bounds: DVec2, p: DVec2) -> bool {
    p.x >= 0.0 && p.x < bounds.x && p.y >= 0.0 && p.y < bounds.y
}
