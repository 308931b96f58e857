//! World plan compiler: generator output in, scene documents and navigation maps out.

pub mod config;
pub mod context;
pub mod fallback;
pub mod generator;
pub mod materials;
pub mod occupancy;
pub mod plan;
pub mod repair;
pub mod sdf;

pub use context::AppContext;
pub use fallback::default_plan;
pub use materials::{Material, MaterialCatalog, Rgba};
pub use occupancy::{ExportSpec, ObstacleSource, OccupancyGridExporter};
pub use plan::WorldPlan;
pub use repair::repair;
pub use sdf::SceneCompiler;
