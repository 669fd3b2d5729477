//! Simple build example: load a board spec, build the part and write it out.

use std::path::Path;
use stripboard::prelude::*;

fn main() -> Result<(), StripboardError> {
    let spec = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/full_board.yaml".to_string());
    let output = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "board.fzpz".to_string());
    let spec = Path::new(&spec);

    if !spec.exists() {
        eprintln!("File not found: {}", spec.display());
        eprintln!("Usage: cargo run --example simple_board [board.yaml] [output.fzpz]");
        std::process::exit(1);
    }

    let board = BoardSpecification::load(spec)?;
    let resolution = StripboardCore::resolve(&board)?;
    let stats = resolution.stats();

    println!("Board: {} ({})", board.meta.title, board.meta.id);
    println!("  Holes:      {}", stats.holes);
    println!("  Connectors: {}", stats.connectors);
    println!("  Buses:      {}", stats.buses);

    let part = StripboardCore::render(&board, &resolution)?;
    part.write_archive(Path::new(&output))?;

    println!();
    println!("Wrote {} with:", output);
    println!("  {}", part.fzp_entry_name());
    println!("  {}", part.svg_entry_name());
    Ok(())
}
