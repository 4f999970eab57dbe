//! Pokable soap-bubble cells painted from a reference image
//!
//! A set of moving centers is decomposed every frame into Voronoi cells or
//! Delaunay triangles, and each polygon is filled with the color of the
//! reference image under its sample point. Clicking pushes nearby centers
//! away; friction brings them back to rest.
//!
//! # Quick Start
//!
//! ```rust
//! use soap_cells::*;
//!
//! let config = SoapConfigBuilder::new()
//!     .seed(42)
//!     .cell_count(200).unwrap()
//!     .build().unwrap();
//!
//! let mut world = SimulationWorld::new(config, DVec2::new(320.0, 240.0)).unwrap();
//! let decomposer = PlanarDecomposer::new(config.region_policy, world.bounds());
//!
//! world.poke(DVec2::new(160.0, 120.0));
//! world.advance();
//!
//! let frame = build_frame(&world, &decomposer, &UniformColor([200, 180, 40]));
//! println!("{} polygons", frame.polygon_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Nearest-center lookups using a KD-tree
//! - `serde`: Serialization support for configuration and mode enums

// Modules
pub mod error;
pub mod config;
pub mod center;
pub mod decomposition;
pub mod sampler;
pub mod input;
pub mod world;
pub mod frame;
pub mod session;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{SoapError, Result};
pub use config::{SoapConfig, SoapConfigBuilder};
pub use center::{CenterBody, MotionParams};
pub use decomposition::{
    clipped_cell, DecompositionMode, PlanarDecomposer, RegionPolicy, RenderPolygon, VoronoiDiagram,
};
pub use sampler::{ColorSampler, PixelIndex, ReferenceImage, Rgb, UniformColor};
pub use input::{command_for, Command, InputEvent, Key, MouseButton};
pub use world::SimulationWorld;
pub use frame::{build_frame, Canvas, FilledPolygon, FrameData};
pub use session::{EventSource, FrameReport, RunSummary, ScriptedEvents, Session};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
