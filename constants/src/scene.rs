/// Scene document format version written on the root element
pub const SDF_VERSION: &str = "1.9";

/// World name used when a plan carries none
pub const DEFAULT_WORLD_NAME: &str = "generated_world";

pub const DEFAULT_MODEL_NAME: &str = "unnamed_model";
pub const DEFAULT_LIGHT_NAME: &str = "light";
pub const DEFAULT_LIGHT_TYPE: &str = "directional";
pub const DEFAULT_LIGHT_POSITION: [f64; 3] = [0.0, 0.0, 10.0];
pub const DEFAULT_DIFFUSE: &str = "1 1 1 1";
pub const DEFAULT_COLOR_HEX: &str = "#FFFFFF";

pub const DEFAULT_GRAVITY: &str = "0 0 -9.81";
pub const DEFAULT_MAX_STEP_SIZE: f64 = 0.001;
pub const DEFAULT_REAL_TIME_FACTOR: f64 = 1.0;

/// Sun synthesised when a plan declares no lights
pub const SUN_NAME: &str = "sun";
pub const SUN_SPECULAR: &str = "0.5 0.5 0.5 1";
pub const SUN_DIRECTION: [f64; 3] = [-0.5, 0.1, -0.9];

/// Fallback plan values
pub const FALLBACK_WORLD_NAME: &str = "default";
pub const FALLBACK_MODEL_NAME: &str = "box";
pub const FALLBACK_MODEL_HEIGHT: f64 = 0.5;
pub const FALLBACK_COLOR_HEX: &str = "#FF0000";
