use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tileconn_common::db::core::DeviceDB;
use tileconn_common::db::parser::{grid, tileconn};
use tileconn_common::db::rrgraph::{GraphStats, RrGraph};
use tileconn_common::util::config::Config;
use tileconn_common::util::{check, generator, logger, visualization};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the routing graph and write it out
    Build,
    /// Build the routing graph and run the checker on it
    Check,
    /// Build the routing graph and print its size
    Stats,
    Generate {
        #[arg(long, default_value_t = 20)]
        width: u32,
        #[arg(long, default_value_t = 20)]
        height: u32,
        #[arg(long, default_value_t = 4)]
        tile_types: usize,
        #[arg(long, default_value_t = 4)]
        wires: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value = "inputs/random.grid")]
        grid_output: String,
        #[arg(long, default_value = "inputs/random_tileconn.json")]
        tileconn_output: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    match args.command.unwrap_or(Commands::Build) {
        Commands::Generate {
            width,
            height,
            tile_types,
            wires,
            seed,
            grid_output,
            tileconn_output,
        } => {
            if width == 0 || height == 0 {
                return Err(anyhow::anyhow!(
                    "Grid must be at least 1x1, got {}x{}",
                    width,
                    height
                ));
            }
            prepare_output_dir(&grid_output)?;
            prepare_output_dir(&tileconn_output)?;
            generator::generate_random_device(
                &grid_output,
                &tileconn_output,
                width,
                height,
                tile_types,
                wires,
                seed,
            )?;
            log::info!("Generated: {} and {}", grid_output, tileconn_output);
        }
        Commands::Build => {
            let graph = build_graph(&config)?;
            if config.build.validate && check::run(&graph).is_err() {
                std::process::exit(1);
            }
            write_outputs(&config, &graph)?;
        }
        Commands::Check => {
            let graph = build_graph(&config)?;
            if check::run(&graph).is_err() {
                std::process::exit(1);
            }
        }
        Commands::Stats => {
            let graph = build_graph(&config)?;
            print!("{}", GraphStats::of(&graph));
        }
    }

    Ok(())
}

fn validate_input_paths(config: &Config) -> anyhow::Result<()> {
    for path in [&config.input.grid_file, &config.input.tileconn_file] {
        if !Path::new(path).exists() {
            return Err(anyhow::anyhow!("Input file missing: {}", path));
        }
    }
    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent()
        && !parent.exists()
        && !parent.as_os_str().is_empty()
    {
        log::info!("Creating output directory: {:?}", parent);
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn load_device(config: &Config) -> anyhow::Result<DeviceDB> {
    validate_input_paths(config)?;
    let mut db = DeviceDB::new();

    log::info!("Parsing grid: {}", config.input.grid_file);
    grid::parse(&mut db, &config.input.grid_file)
        .with_context(|| format!("Invalid grid file '{}'", config.input.grid_file))?;

    log::info!("Parsing tile connectivity: {}", config.input.tileconn_file);
    tileconn::parse(&mut db, &config.input.tileconn_file).with_context(|| {
        format!(
            "Invalid tile connectivity file '{}'",
            config.input.tileconn_file
        )
    })?;

    log::info!(
        "Device: {}x{} grid, {} tile types, {} connectivity records",
        db.grid.width(),
        db.grid.height(),
        db.tile_types.len(),
        db.connections.len()
    );
    Ok(db)
}

fn build_graph(config: &Config) -> anyhow::Result<RrGraph> {
    let db = load_device(config)?;
    log::info!("Building routing graph...");
    let graph = tileconn_graph::build(&db, &config.build).context("Graph build failed")?;
    log::info!(
        "Built {} nodes and {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );
    Ok(graph)
}

fn write_outputs(config: &Config, graph: &RrGraph) -> anyhow::Result<()> {
    let graph_file = &config.output.graph_file;
    prepare_output_dir(graph_file)?;
    log::info!("Writing routing graph to {}", graph_file);
    let writer = BufWriter::new(
        File::create(graph_file).with_context(|| format!("cannot create '{}'", graph_file))?,
    );
    serde_json::to_writer_pretty(writer, graph)
        .with_context(|| format!("cannot write '{}'", graph_file))?;

    if let Some(heatmap) = &config.output.heatmap_file {
        prepare_output_dir(heatmap)?;
        log::info!("Generating channel usage heatmap...");
        if let Err(e) = visualization::draw_channel_usage(graph, heatmap, config.output.heatmap_size)
        {
            log::warn!("Could not write heatmap '{}': {}", heatmap, e);
        }
    }
    Ok(())
}
