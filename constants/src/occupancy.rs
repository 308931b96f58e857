/// Occupancy map conventions for the navigation stack sidecar

/// Pixel intensity for free space
pub const FREE_PIXEL: u8 = 255;

/// Pixel intensity for occupied space
pub const OCCUPIED_PIXEL: u8 = 0;

pub const MAP_NEGATE: u8 = 0;
pub const OCCUPIED_THRESH: f64 = 0.65;
pub const FREE_THRESH: f64 = 0.196;

pub const DEFAULT_RESOLUTION: f64 = 0.05;
pub const DEFAULT_MAP_WIDTH: u32 = 2000;
pub const DEFAULT_MAP_HEIGHT: u32 = 2000;

pub const RASTER_EXTENSION: &str = "pgm";
pub const METADATA_EXTENSION: &str = "yaml";

/// Illustrative obstacles in pixel space (x, y, width, height).
/// Painted outline-inclusive, so each covers (width + 1) x (height + 1) pixels.
pub const PLACEHOLDER_OBSTACLES: &[(u32, u32, u32, u32)] =
    &[(100, 100, 200, 50), (400, 300, 100, 150), (700, 500, 300, 100)];

/// Progress checkpoints reported during export (percent)
pub const PROGRESS_STARTED: u8 = 10;
pub const PROGRESS_RASTER: u8 = 70;
pub const PROGRESS_METADATA: u8 = 100;
