//! Integration tests for the stripboard library

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use stripboard::prelude::*;
use stripboard::{ConfigError, DrawOp, Position, ResolveError};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> BoardSpecification {
    stripboard::load_board(&fixture_path(name)).expect("Fixture should load")
}

#[test]
fn test_simple_run_end_to_end() {
    let board = load("simple_run.yaml");
    let resolution = StripboardCore::resolve(&board).expect("Should resolve");

    let holes: Vec<Position> = resolution
        .holes()
        .map(|op| match op {
            DrawOp::Hole { center, .. } => *center,
            other => panic!("Expected hole, got {:?}", other),
        })
        .collect();
    assert_eq!(
        holes,
        vec![
            Position::new(1.0, 1.0),
            Position::new(3.0, 1.0),
            Position::new(5.0, 1.0),
        ]
    );

    let bus = resolution.topology.bus("r1").expect("Should have bus r1");
    assert_eq!(bus.members, vec!["r1-0", "r1-1", "r1-2"]);

    let part = StripboardCore::render(&board, &resolution).expect("Should render");
    assert!(part
        .svg
        .contains(r#"<line id="r1-trace" x1="1mm" y1="1mm" x2="5mm" y2="1mm""#));
    assert!(part.fzp.contains(r#"<property name="size">10mm X 5mm</property>"#));
    assert!(part.fzp.contains("<date>2024-03-01T12:00:00Z</date>"));
}

#[test]
fn test_full_board_counts() {
    let board = load("full_board.yaml");
    let resolution = StripboardCore::resolve(&board).expect("Should resolve");
    let stats = resolution.stats();

    assert_eq!(stats.connectors, 192);
    assert_eq!(stats.holes, 192);
    assert_eq!(stats.traces, 15);
    assert_eq!(stats.buses, 14);

    let gnd = resolution.topology.bus("gnd").expect("Should have shared bus");
    assert_eq!(gnd.members.len(), 33);
    assert!(resolution.topology.bus("strips-4").is_some());
    assert!(resolution.topology.bus("cols-4").is_some());
}

#[test]
fn test_every_svg_hole_has_a_connector() {
    let board = load("full_board.yaml");
    let part = StripboardCore::build(&board).expect("Should build");
    let resolution = StripboardCore::resolve(&board).expect("Should resolve");

    for connector in &resolution.topology.connectors {
        assert!(
            part.svg.contains(&format!(r#"<circle id="{}""#, connector.svg_id)),
            "Drawing should contain hole {}",
            connector.svg_id
        );
        assert!(
            part.fzp.contains(&format!(r#"<connector id="{}""#, connector.id)),
            "Part should declare connector {}",
            connector.id
        );
    }
}

#[test]
fn test_diagonal_run_aborts_build() {
    let board = load("diagonal_run.yaml");
    match StripboardCore::build(&board) {
        Err(StripboardError::Resolve(ResolveError::RangeShape { id, range })) => {
            assert_eq!(id, "crooked");
            assert_eq!(range, "A0:B1");
        }
        other => panic!("Expected range shape error, got {:?}", other),
    }
}

#[test]
fn test_colliding_ids_abort_build() {
    let board = load("colliding_ids.yaml");
    match StripboardCore::build(&board) {
        Err(StripboardError::Resolve(ResolveError::DuplicateId(id))) => assert_eq!(id, "s-0"),
        other => panic!("Expected duplicate id error, got {:?}", other),
    }
}

#[test]
fn test_unknown_component_fails_to_load() {
    let result = stripboard::load_board(&fixture_path("unknown_component.yaml"));
    match result {
        Err(StripboardError::Parse(ConfigError::UnhandledVariant(keys))) => {
            assert!(keys.contains("jumper"), "Should name the unknown key: {}", keys)
        }
        other => panic!("Expected unhandled variant, got {:?}", other),
    }
}

#[test]
fn test_missing_spec_file() {
    let result = stripboard::load_board(&fixture_path("does_not_exist.yaml"));
    assert!(matches!(
        result,
        Err(StripboardError::Parse(ConfigError::Io(_)))
    ));
}

#[test]
fn test_build_archive_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("full.fzpz");

    let part = StripboardCore::build_archive(&fixture_path("full_board.yaml"), &output)
        .expect("Should write archive");
    assert_eq!(part.board_id, "full-board");

    let mut archive = zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let mut fzp = String::new();
    archive
        .by_name("part.full-board.fzp")
        .expect("Archive should hold the part definition")
        .read_to_string(&mut fzp)
        .unwrap();
    assert_eq!(fzp, part.fzp);
    assert!(fzp.contains(r#"<module moduleId="full-board">"#));
    assert!(fzp.contains(r#"image="breadboard/full-board.svg""#));

    let mut svg = String::new();
    archive
        .by_name("svg.breadboard.full-board.svg")
        .expect("Archive should hold the drawing")
        .read_to_string(&mut svg)
        .unwrap();
    assert_eq!(svg, part.svg);
}

#[test]
fn test_build_is_reproducible() {
    let board = load("full_board.yaml");
    let first = StripboardCore::build(&board).unwrap();
    let second = StripboardCore::build(&board).unwrap();
    assert_eq!(first, second);
}
