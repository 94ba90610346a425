use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use region_gen::{
    load_composer_config_from_env, resolve_seed, seed_for_tile, CellClass, ComposerConfig,
    GenerationContext, GridPos, RegionComposer,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Runs one impassable region composition", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 250)]
    width: u32,

    /// Grid height in cells
    #[arg(long, default_value_t = 250)]
    height: u32,

    /// Explicit seed; otherwise derived from --world and --tile
    #[arg(long)]
    seed: Option<u64>,

    /// World name used to derive the seed
    #[arg(long, default_value = "harness")]
    world: String,

    /// World tile id used to derive the seed
    #[arg(long, default_value_t = 0)]
    tile: u32,

    /// Composer config JSON (defaults to REGION_CONFIG_PATH or the builtin config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Carve the quest clearing
    #[arg(long)]
    special_area: bool,

    /// Road or river cell kept open on filled maps (format: x,z)
    #[arg(long = "preserve")]
    preserved: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,

    /// Write the rendering here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ComposerConfig::from_file(path)
            .with_context(|| format!("Failed to load composer config {}", path.display()))?,
        None => {
            let (config, _) = load_composer_config_from_env();
            (*config).clone()
        }
    };

    let base_seed = args
        .seed
        .unwrap_or_else(|| seed_for_tile(&args.world, args.tile));
    let seed = resolve_seed(&config, base_seed);
    let ctx = GenerationContext {
        wants_special_area: args.special_area,
        preserved_cells: parse_positions(&args.preserved)?,
    };

    let result = RegionComposer::new(&config)
        .compose(args.width, args.height, seed, &ctx)
        .with_context(|| format!("Composition of {}x{} failed", args.width, args.height))?;

    info!(
        target: "impassable::harness",
        seed,
        fingerprint = result.fingerprint(),
        impenetrable = result.count(CellClass::Impenetrable),
        rough = result.count(CellClass::Rough),
        cleared = result.count(CellClass::Cleared),
        start = ?result.start_spot(),
        "harness.composed"
    );

    let rendered = match args.format {
        OutputFormat::Ascii => result.to_ascii(),
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
    };
    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

fn parse_positions(raw: &[String]) -> Result<Vec<GridPos>> {
    raw.iter()
        .map(|value| {
            let (x, z) = value
                .split_once(',')
                .ok_or_else(|| anyhow::anyhow!("Position must be in x,z form, got '{}'", value))?;
            let x = x
                .trim()
                .parse()
                .with_context(|| format!("Invalid x coordinate in '{}'", value))?;
            let z = z
                .trim()
                .parse()
                .with_context(|| format!("Invalid z coordinate in '{}'", value))?;
            Ok(GridPos::new(x, z))
        })
        .collect()
}
