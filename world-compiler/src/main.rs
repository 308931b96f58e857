/// World compiler command line entry point
use clap::{Parser, Subcommand};
use constants::occupancy::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_RESOLUTION};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use world_compiler::generator::{LlamaCliGenerator, plan_from_generator};
use world_compiler::occupancy::ExportPhase;
use world_compiler::repair::try_repair;
use world_compiler::{AppContext, ExportSpec, ObstacleSource, WorldPlan, default_plan};

#[derive(Parser)]
#[command(
    name = "world-compiler",
    about = "Turns natural language world plans into SDF scenes and occupancy maps"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a world from a prompt and save it as SDF
    Generate {
        prompt: String,
        #[arg(long, default_value = "world.sdf")]
        out: PathBuf,
    },
    /// Recover a plan from captured generator output
    Repair {
        input: PathBuf,
        /// Write the plan here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compile a plan JSON file into an SDF world
    Compile {
        plan: PathBuf,
        #[arg(long, default_value = "world.sdf")]
        out: PathBuf,
    },
    /// Export an occupancy grid and map metadata for a world
    Export {
        world: PathBuf,
        output_dir: PathBuf,
        #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
        resolution: f64,
        #[arg(long, default_value_t = DEFAULT_MAP_WIDTH)]
        width: u32,
        #[arg(long, default_value_t = DEFAULT_MAP_HEIGHT)]
        height: u32,
        /// Rasterize this plan's models instead of the placeholder obstacles
        #[arg(long)]
        plan: Option<PathBuf>,
    },
    /// List the material catalog
    Materials,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let context = AppContext::from_env();

    match cli.command {
        Command::Generate { prompt, out } => {
            let mut generator = LlamaCliGenerator::new(context.generator.clone());
            let plan = plan_from_generator(&mut generator, &prompt);
            let sdf = context.compiler.compile(Some(&plan))?;
            context.compiler.save_document(&sdf, &out)?;
        }
        Command::Repair { input, out } => {
            let raw = fs::read_to_string(&input)?;
            let plan = world_compiler::repair(&raw).unwrap_or_else(|| {
                info!("Using fallback: creating simple default world");
                default_plan()
            });
            let json = serde_json::to_string_pretty(&plan)?;
            match out {
                Some(path) => fs::write(path, json)?,
                None => println!("{}", json),
            }
        }
        Command::Compile { plan, out } => {
            let plan = read_plan(&plan)?;
            let sdf = context.compiler.compile(plan.as_ref())?;
            context.compiler.save_document(&sdf, &out)?;
        }
        Command::Export {
            world,
            output_dir,
            resolution,
            width,
            height,
            plan,
        } => {
            let plan = match plan {
                Some(path) => read_plan(&path)?,
                None => None,
            };
            let source = plan.as_ref().map_or(ObstacleSource::Placeholder, ObstacleSource::Plan);
            let spec = ExportSpec {
                world_source: world,
                output_dir,
                resolution,
                width,
                height,
            };

            let pb = ProgressBar::new(100);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {pos}% {msg}")?
                    .progress_chars("▉▊▋▌▍▎▏ "),
            );
            let output = context.exporter.export_with_progress(
                &spec,
                source,
                &mut |phase: ExportPhase| pb.set_position(phase.percent() as u64),
            )?;
            pb.finish_with_message("Map exported");

            println!("Raster:   {}", output.raster_path.display());
            println!("Metadata: {}", output.metadata_path.display());
        }
        Command::Materials => {
            for name in context.materials.names() {
                if let Some(material) = context.materials.lookup(&name) {
                    println!(
                        "{:<10} ambient {}  diffuse {}  specular {}",
                        material.name,
                        material.ambient.to_sdf_string(),
                        material.diffuse.to_sdf_string(),
                        material.specular.to_sdf_string()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Reads a plan file; a blank file is an absent plan.
fn read_plan(path: &std::path::Path) -> Result<Option<WorldPlan>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(try_repair(&text)?))
}
