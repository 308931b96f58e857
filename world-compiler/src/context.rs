/// Explicitly constructed application state shared by the front ends.
use crate::config::GeneratorConfig;
use crate::materials::MaterialCatalog;
use crate::occupancy::OccupancyGridExporter;
use crate::sdf::SceneCompiler;

#[derive(Debug)]
pub struct AppContext {
    pub generator: GeneratorConfig,
    pub materials: MaterialCatalog,
    pub compiler: SceneCompiler,
    pub exporter: OccupancyGridExporter,
}

impl AppContext {
    pub fn new(generator: GeneratorConfig) -> Self {
        Self {
            generator,
            materials: MaterialCatalog::new(),
            compiler: SceneCompiler::new(),
            exporter: OccupancyGridExporter::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }
}
