//! Breadboard-view drawing of the board.
//!
//! Every coordinate and size carries an explicit `mm` unit so the design
//! tool places holes at their physical positions.

use std::fmt::{self, Write};

use super::escape;
use crate::board::schema::BoardSpecification;
use crate::topology::{DrawOp, Resolution};

const BOARD_FILL: &str = "#deb675";
const TRACE_COLOR: &str = "brown";
const TRACE_WIDTH_MM: f64 = 1.5;
const TRACE_STYLE: &str = "stroke-linecap:round; stroke-opacity: 0.5;";

/// Circle radius and stroke for one kind of hole, in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleStyle {
    pub radius: f64,
    pub stroke_width: f64,
}

pub const DRILLED_HOLE: HoleStyle = HoleStyle {
    radius: 0.5,
    stroke_width: 0.35,
};

/// Small dot standing in for a surface pad
pub const PAD_HOLE: HoleStyle = HoleStyle {
    radius: 0.1,
    stroke_width: 0.1,
};

impl HoleStyle {
    pub fn for_hole(drilled: bool) -> Self {
        if drilled {
            DRILLED_HOLE
        } else {
            PAD_HOLE
        }
    }
}

/// Render the drawing document for a resolved board.
pub fn render_svg(board: &BoardSpecification, resolution: &Resolution) -> Result<String, fmt::Error> {
    let mut svg = String::new();

    writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">"#,
        w = board.width,
        h = board.height
    )?;
    writeln!(svg, r#"  <g id="breadboard">"#)?;

    for op in &resolution.geometry {
        write_op(&mut svg, op)?;
    }

    writeln!(svg, "  </g>")?;
    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn write_op(svg: &mut String, op: &DrawOp) -> fmt::Result {
    match op {
        DrawOp::Outline { width, height } => writeln!(
            svg,
            r#"    <path id="boardoutline" stroke-width="0" stroke="none" fill="{fill}" fill-opacity="1" d="M0,0 L{w},0 {w},{h} 0,{h} 0,0"/>"#,
            fill = BOARD_FILL,
            w = width,
            h = height
        ),
        DrawOp::Line { id, from, to } => writeln!(
            svg,
            r#"    <line id="{}" x1="{}mm" y1="{}mm" x2="{}mm" y2="{}mm" stroke="{}" stroke-width="{}mm" style="{}"/>"#,
            escape(id),
            from.x,
            from.y,
            to.x,
            to.y,
            TRACE_COLOR,
            TRACE_WIDTH_MM,
            TRACE_STYLE
        ),
        DrawOp::Hole {
            id,
            center,
            drilled,
        } => {
            let style = HoleStyle::for_hole(*drilled);
            writeln!(
                svg,
                r#"    <circle id="{}" cx="{}mm" cy="{}mm" r="{}mm" stroke-width="{}mm" stroke="{}" fill="none"/>"#,
                escape(id),
                center.x,
                center.y,
                style.radius,
                style.stroke_width,
                TRACE_COLOR
            )
        }
    }
}
