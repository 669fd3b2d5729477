//! Stripboard CLI - Fritzing stripboard part generation from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use stripboard::{
    cell_to_coord, coord_to_position, BoardSpecification, BusGraph, GridMetadata, PartFiles,
    Resolution, StripboardCore,
};
use tracing::Level;

#[derive(Parser)]
#[command(name = "stripboard")]
#[command(about = "Fritzing stripboard part generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log resolution progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a part bundle from a YAML board spec
    Build {
        /// Path to the board spec (.yaml)
        #[arg(value_name = "SPEC")]
        spec: PathBuf,

        /// Output .fzpz archive, or a directory with --dir
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Write loose .fzp and .svg files instead of an archive
        #[arg(long)]
        dir: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Resolve a board and report its holes, traces and buses
    Inspect {
        /// Path to the board spec (.yaml)
        #[arg(value_name = "SPEC")]
        spec: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Convert cell names to coordinates and hole positions
    Cell {
        /// Cell names such as A0 or BC12
        #[arg(value_name = "CELL", required = true)]
        cells: Vec<String>,

        /// Hole spacing in mm
        #[arg(long, default_value_t = stripboard::board::DEFAULT_PITCH)]
        pitch: f64,

        /// Grid origin in mm, as X,Y
        #[arg(long, value_parser = parse_origin, default_value = "0,0")]
        origin: (f64, f64),

        /// Mirror the grid horizontally
        #[arg(long)]
        mirrored: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Build {
            spec,
            output,
            dir,
            format,
        } => handle_build(&spec, &output, dir, format),
        Commands::Inspect { spec, format } => handle_inspect(&spec, format),
        Commands::Cell {
            cells,
            pitch,
            origin,
            mirrored,
        } => handle_cell(
            &cells,
            GridMetadata {
                origin,
                pitch,
                mirrored,
            },
        ),
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn parse_origin(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", value))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad X '{}': {}", x, e))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad Y '{}': {}", y, e))?;
    Ok((x, y))
}

fn load_and_resolve(spec: &Path) -> Result<(BoardSpecification, Resolution), i32> {
    let board = match stripboard::load_board(spec) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(1);
        }
    };
    match StripboardCore::resolve(&board) {
        Ok(resolution) => Ok((board, resolution)),
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(1)
        }
    }
}

fn handle_build(spec: &Path, output: &Path, dir: bool, format: OutputFormat) -> i32 {
    let (board, resolution) = match load_and_resolve(spec) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let part = match StripboardCore::render(&board, &resolution) {
        Ok(part) => part,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let written = if dir {
        part.write_to_dir(output)
    } else {
        part.write_archive(output).map(|()| vec![output.to_path_buf()])
    };
    let written = match written {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match format {
        OutputFormat::Human => {
            output_build_human(&board, &resolution, &part, &written);
            0
        }
        OutputFormat::Json => {
            let stats = resolution.stats();
            let report = serde_json::json!({
                "board": board.meta.id,
                "title": board.meta.title,
                "entries": [part.fzp_entry_name(), part.svg_entry_name()],
                "written": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
                "stats": stats,
            });
            print_json(&report)
        }
    }
}

fn output_build_human(
    board: &BoardSpecification,
    resolution: &Resolution,
    part: &PartFiles,
    written: &[PathBuf],
) {
    let stats = resolution.stats();
    println!("\nBoard: {} ({})", board.meta.title, board.meta.id);
    println!("{}", "─".repeat(60));
    println!("  Holes:      {}", stats.holes);
    println!("  Traces:     {}", stats.traces);
    println!("  Connectors: {}", stats.connectors);
    println!("  Buses:      {}", stats.buses);
    println!("\n  Entries:");
    println!("    - {}", part.fzp_entry_name());
    println!("    - {}", part.svg_entry_name());
    println!("\n  Written:");
    for path in written {
        println!("    - {}", path.display());
    }
}

fn handle_inspect(spec: &Path, format: OutputFormat) -> i32 {
    let (board, resolution) = match load_and_resolve(spec) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let graph = BusGraph::from_topology(&resolution.topology);

    match format {
        OutputFormat::Human => {
            output_inspect_human(&board, &resolution, &graph);
            0
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "board": board.meta.id,
                "title": board.meta.title,
                "width": board.width,
                "height": board.height,
                "grids": board.board.len(),
                "stats": resolution.stats(),
                "buses": resolution.topology.buses,
                "consistent": graph.is_consistent(),
                "floating": graph.floating_connectors(),
                "shorted": graph.shorted_connectors(),
                "duplicates": graph.duplicate_connectors(),
            });
            print_json(&report)
        }
    }
}

fn output_inspect_human(board: &BoardSpecification, resolution: &Resolution, graph: &BusGraph) {
    let stats = resolution.stats();
    println!("\nBoard: {} ({})", board.meta.title, board.meta.id);
    println!("{}", "─".repeat(60));
    println!("  Size:       {}mm X {}mm", board.width, board.height);
    println!("  Grids:      {}", board.board.len());
    println!("  Holes:      {}", stats.holes);
    println!("  Traces:     {}", stats.traces);
    println!("  Connectors: {}", stats.connectors);

    println!("\n  Buses:");
    for bus in &resolution.topology.buses {
        println!("    {} ({} members)", bus.id, bus.members.len());
        println!("      {}", bus.members.join(" "));
    }

    if graph.is_consistent() {
        println!("\n  Every connector sits on exactly one bus");
        return;
    }

    let floating = graph.floating_connectors();
    if !floating.is_empty() {
        println!("\n  FLOATING:");
        for id in floating {
            println!("    - {}", id);
        }
    }
    let shorted = graph.shorted_connectors();
    if !shorted.is_empty() {
        println!("\n  SHORTED:");
        for id in shorted {
            println!("    - {} ({})", id, graph.buses_of(id).join(", "));
        }
    }
    if !graph.duplicate_connectors().is_empty() {
        println!("\n  DUPLICATE IDS:");
        for id in graph.duplicate_connectors() {
            println!("    - {}", id);
        }
    }
}

fn handle_cell(cells: &[String], grid: GridMetadata) -> i32 {
    if !(grid.pitch.is_finite() && grid.pitch > 0.0) {
        eprintln!("Error: pitch must be positive, got {}", grid.pitch);
        return 1;
    }

    for cell in cells {
        match cell_to_coord(cell) {
            Ok(coord) => {
                let position = coord_to_position(coord, &grid);
                println!(
                    "{}\tcol={} row={}\tx={} y={}",
                    cell, coord.col, coord.row, position.x, position.y
                );
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    0
}

fn print_json(value: &serde_json::Value) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin() {
        assert_eq!(parse_origin("1.27,2.54"), Ok((1.27, 2.54)));
        assert_eq!(parse_origin(" 3 , 4 "), Ok((3.0, 4.0)));
        assert!(parse_origin("3").is_err());
        assert!(parse_origin("a,b").is_err());
    }
}
