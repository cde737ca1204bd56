//! dzi-tiler - Deep Zoom tile pyramids from a single image.
//!
//! This binary parses the CLI and dispatches to the generate, plan and view
//! commands.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dzi_tiler::{
    codec::ImageCodec,
    config::{Cli, Command, GenerateConfig, PlanConfig, ViewConfig},
    plan_levels,
    server::{create_router, ViewerConfig},
    Level, PyramidGenerator, TileGrid,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Generate(config) => run_generate(config),
        Command::Plan(config) => run_plan(config),
        Command::View(config) => run_view(config).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "dzi_tiler=debug,tower_http=debug"
    } else {
        "dzi_tiler=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Generate Command
// =============================================================================

fn run_generate(config: GenerateConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let pyramid_config = match config.pyramid_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let generator = PyramidGenerator::new(pyramid_config);
    let output = match generator.run(&config.source) {
        Ok(output) => output,
        Err(e) => {
            error!("Tiling failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        return print_json(&output);
    }

    println!("Tiles:       {}", output.tiles_dir.display());
    match &output.descriptors {
        Some(paths) => {
            println!("Descriptor:  {}", paths.dzi.display());
            println!("Callback:    {}", paths.js.display());
        }
        None => println!("Descriptors: skipped ({:?} is not a valid callback name)", output.name),
    }
    println!(
        "Levels:      {} ({} tiles)",
        output.levels.len(),
        output.tile_count
    );

    ExitCode::SUCCESS
}

// =============================================================================
// Plan Command
// =============================================================================

#[derive(Serialize)]
struct PlannedLevel {
    #[serde(flatten)]
    level: Level,
    grid: TileGrid,
}

fn run_plan(config: PlanConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let pyramid_config = match config.pyramid_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dimensions = match (&config.source, config.width, config.height) {
        (Some(source), _, _) => ImageCodec::new()
            .probe_dimensions(source)
            .map_err(|e| format!("Cannot read {}: {}", source.display(), e)),
        (None, Some(width), Some(height)) => Ok((width, height)),
        _ => Err("Provide a source image or both --width and --height".to_string()),
    };

    let (width, height) = match dimensions {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let levels = match plan_levels(width, height) {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let planned: Vec<PlannedLevel> = levels
        .into_iter()
        .map(|level| PlannedLevel {
            grid: TileGrid::for_level(&level, &pyramid_config),
            level,
        })
        .collect();

    if config.json {
        return print_json(&planned);
    }

    println!(
        "{}x{} px, tile size {}, overlap {}",
        width,
        height,
        pyramid_config.tile_size(),
        pyramid_config.overlap()
    );
    println!();
    println!("Level  Scale         Size            Grid      Tiles");
    println!("─────  ────────────  ──────────────  ────────  ──────");
    for PlannedLevel { level, grid } in &planned {
        println!(
            "{:>5}  {:<12}  {:>14}  {:>8}  {:>6}",
            level.index,
            format!("{}", level.scale),
            format!("{}x{}", level.width, level.height),
            format!("{}x{}", grid.cols, grid.rows),
            grid.tile_count()
        );
    }
    let total: u64 = planned.iter().map(|p| p.grid.tile_count()).sum();
    println!();
    println!("Total: {} level(s), {} tile(s)", planned.len(), total);

    ExitCode::SUCCESS
}

// =============================================================================
// View Command
// =============================================================================

async fn run_view(config: ViewConfig) -> ExitCode {
    init_logging(config.verbose);

    let viewer_config = match ViewerConfig::from_descriptor(Path::new(&config.descriptor)) {
        Ok(c) => c.with_tracing(!config.no_tracing),
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let viewer_config = match config.cors_origins {
        Some(ref origins) => viewer_config.with_cors_origins(origins.clone()),
        None => viewer_config,
    };

    let addr = config.bind_address();
    info!("Serving {} from {}", viewer_config.name, viewer_config.root.display());

    let router = create_router(viewer_config);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Viewer listening on: http://{}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}
