/// Occupancy grid export for the navigation stack.
/// Writes a binary PGM raster plus a YAML sidecar describing how to place it.
use crate::plan::{ShapeKind, WorldPlan};
use constants::occupancy::{
    FREE_PIXEL, FREE_THRESH, MAP_NEGATE, METADATA_EXTENSION, OCCUPIED_PIXEL, OCCUPIED_THRESH,
    PLACEHOLDER_OBSTACLES, PROGRESS_METADATA, PROGRESS_RASTER, PROGRESS_STARTED,
    RASTER_EXTENSION,
};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ImageEncoder};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export parameters: {0}")]
    InvalidParameters(String),
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to save occupancy grid {}: {cause}", path.display())]
    SaveRaster { path: PathBuf, cause: String },
    #[error("Failed to write map metadata {}: {source}", path.display())]
    WriteMetadata {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parameters of one export request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpec {
    pub world_source: PathBuf,
    pub output_dir: PathBuf,
    /// Metres per pixel.
    pub resolution: f64,
    pub width: u32,
    pub height: u32,
}

impl ExportSpec {
    /// World position of the map's bottom-left corner; the map centre sits on the world origin.
    pub fn origin(&self) -> (f64, f64) {
        (
            -(self.width as f64 * self.resolution) / 2.0,
            -(self.height as f64 * self.resolution) / 2.0,
        )
    }

    /// World source file name with its extension stripped.
    pub fn base_name(&self) -> Result<String, ExportError> {
        self.world_source
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                ExportError::InvalidParameters(format!(
                    "world source has no file name: {}",
                    self.world_source.display()
                ))
            })
    }

    fn validate(&self) -> Result<(), ExportError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(ExportError::InvalidParameters(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ExportError::InvalidParameters(format!(
                "map dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Where occupied cells come from.
#[derive(Debug, Clone, Copy)]
pub enum ObstacleSource<'a> {
    /// Fixed illustrative rectangles in pixel space.
    Placeholder,
    /// Footprints of the plan's models projected onto the ground plane.
    Plan(&'a WorldPlan),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Started,
    RasterWritten,
    MetadataWritten,
}

impl ExportPhase {
    pub fn percent(&self) -> u8 {
        match self {
            ExportPhase::Started => PROGRESS_STARTED,
            ExportPhase::RasterWritten => PROGRESS_RASTER,
            ExportPhase::MetadataWritten => PROGRESS_METADATA,
        }
    }
}

/// Receives the three ordered export checkpoints.
pub trait ExportProgress {
    fn report(&mut self, phase: ExportPhase);
}

impl<F: FnMut(ExportPhase)> ExportProgress for F {
    fn report(&mut self, phase: ExportPhase) {
        self(phase)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    pub raster_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Ground-plane footprint of one model, in world metres.
#[derive(Debug, Clone, Copy)]
enum Footprint {
    Rect {
        cx: f64,
        cy: f64,
        half_x: f64,
        half_y: f64,
        cos: f64,
        sin: f64,
    },
    Disc {
        cx: f64,
        cy: f64,
        radius: f64,
    },
}

impl Footprint {
    fn from_plan(plan: &WorldPlan) -> Vec<Footprint> {
        plan.models
            .iter()
            .map(|model| {
                let [cx, cy, _] = model.position();
                let [sx, sy, _] = model.scale();
                match model.shape_kind() {
                    ShapeKind::Box => {
                        let yaw = model.rotation()[2];
                        Footprint::Rect {
                            cx,
                            cy,
                            half_x: sx.abs() / 2.0,
                            half_y: sy.abs() / 2.0,
                            cos: yaw.cos(),
                            sin: yaw.sin(),
                        }
                    }
                    ShapeKind::Sphere | ShapeKind::Cylinder => Footprint::Disc {
                        cx,
                        cy,
                        radius: sx.abs(),
                    },
                }
            })
            .collect()
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            Footprint::Rect {
                cx,
                cy,
                half_x,
                half_y,
                cos,
                sin,
            } => {
                // Rotate the query point into the box frame.
                let dx = x - cx;
                let dy = y - cy;
                let local_x = dx * cos + dy * sin;
                let local_y = -dx * sin + dy * cos;
                local_x.abs() <= half_x && local_y.abs() <= half_y
            }
            Footprint::Disc { cx, cy, radius } => {
                let dx = x - cx;
                let dy = y - cy;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }
}

/// Blocking exporter; run it off any latency-sensitive thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct OccupancyGridExporter;

impl OccupancyGridExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(
        &self,
        spec: &ExportSpec,
        source: ObstacleSource<'_>,
    ) -> Result<ExportOutput, ExportError> {
        self.export_with_progress(spec, source, &mut |_phase: ExportPhase| {})
    }

    /// Writes `<base>.pgm` and `<base>.yaml` into the output directory.
    pub fn export_with_progress(
        &self,
        spec: &ExportSpec,
        source: ObstacleSource<'_>,
        progress: &mut dyn ExportProgress,
    ) -> Result<ExportOutput, ExportError> {
        info!(
            "Converting world to occupancy map: {}",
            spec.world_source.display()
        );
        spec.validate()?;
        let base_name = spec.base_name()?;

        fs::create_dir_all(&spec.output_dir).map_err(|source| {
            let err = ExportError::CreateDir {
                path: spec.output_dir.clone(),
                source,
            };
            error!("{}", err);
            err
        })?;

        let raster_name = format!("{}.{}", base_name, RASTER_EXTENSION);
        let raster_path = spec.output_dir.join(&raster_name);
        let metadata_path = spec
            .output_dir
            .join(format!("{}.{}", base_name, METADATA_EXTENSION));

        progress.report(ExportPhase::Started);

        let pixels = self.rasterize(spec, source);
        write_pgm(&raster_path, &pixels, spec.width, spec.height).inspect_err(|e| error!("{}", e))?;
        info!("Occupancy grid saved to: {}", raster_path.display());
        progress.report(ExportPhase::RasterWritten);

        fs::write(&metadata_path, map_metadata(&raster_name, spec)).map_err(|source| {
            let err = ExportError::WriteMetadata {
                path: metadata_path.clone(),
                source,
            };
            error!("{}", err);
            err
        })?;
        info!("Map metadata saved to: {}", metadata_path.display());
        progress.report(ExportPhase::MetadataWritten);

        Ok(ExportOutput {
            raster_path,
            metadata_path,
        })
    }

    /// Row-major greyscale pixels, row 0 at the top of the map.
    fn rasterize(&self, spec: &ExportSpec, source: ObstacleSource<'_>) -> Vec<u8> {
        let width = spec.width as usize;
        let height = spec.height as usize;
        let mut pixels = vec![FREE_PIXEL; width * height];

        match source {
            ObstacleSource::Placeholder => {
                for &(x, y, w, h) in PLACEHOLDER_OBSTACLES {
                    fill_rect(&mut pixels, width, height, x, y, w, h);
                }
            }
            ObstacleSource::Plan(plan) => {
                let footprints = Footprint::from_plan(plan);
                info!("Rasterizing {} model footprints", footprints.len());

                let (origin_x, origin_y) = spec.origin();
                let resolution = spec.resolution;

                pixels
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(row, line)| {
                        let y = origin_y + ((height - row) as f64 - 0.5) * resolution;
                        for (col, pixel) in line.iter_mut().enumerate() {
                            let x = origin_x + (col as f64 + 0.5) * resolution;
                            if footprints.iter().any(|f| f.contains(x, y)) {
                                *pixel = OCCUPIED_PIXEL;
                            }
                        }
                    });
            }
        }

        pixels
    }
}

/// Fills an outline-inclusive rectangle, clipped to the raster.
fn fill_rect(pixels: &mut [u8], width: usize, height: usize, x: u32, y: u32, w: u32, h: u32) {
    let x0 = x as usize;
    let y0 = y as usize;
    let x1 = (x0 + w as usize).min(width.saturating_sub(1));
    let y1 = (y0 + h as usize).min(height.saturating_sub(1));

    if x0 >= width || y0 >= height {
        return;
    }

    for row in y0..=y1 {
        pixels[row * width + x0..=row * width + x1].fill(OCCUPIED_PIXEL);
    }
}

fn write_pgm(path: &Path, pixels: &[u8], width: u32, height: u32) -> Result<(), ExportError> {
    let save_error = |cause: String| ExportError::SaveRaster {
        path: path.to_path_buf(),
        cause,
    };

    let file = File::create(path).map_err(|e| save_error(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    PnmEncoder::new(&mut writer)
        .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
        .write_image(pixels, width, height, ColorType::L8)
        .map_err(|e| save_error(e.to_string()))?;
    writer.flush().map_err(|e| save_error(e.to_string()))
}

/// Map server sidecar; the image is referenced relative to the sidecar.
fn map_metadata(raster_name: &str, spec: &ExportSpec) -> String {
    let (origin_x, origin_y) = spec.origin();
    format!(
        "image: {}\nresolution: {:?}\norigin: [{:?}, {:?}, 0.0]\nnegate: {}\noccupied_thresh: {:?}\nfree_thresh: {:?}\n",
        raster_name, spec.resolution, origin_x, origin_y, MAP_NEGATE, OCCUPIED_THRESH, FREE_THRESH
    )
}
