//! Part-definition (`.fzp`) document.

use std::fmt::{self, Write};

use chrono::SecondsFormat;

use super::escape;
use crate::board::schema::BoardSpecification;
use crate::topology::Resolution;

pub const FAMILY: &str = "Generic Stripboard";

/// View sections in the order the design tool expects, with their layer ids.
const VIEWS: [(&str, &str); 4] = [
    ("iconView", "icon"),
    ("breadboardView", "breadboard"),
    ("schematicView", "schematic"),
    ("pcbView", "pcb"),
];

/// Image path every view points at for the given board.
pub fn breadboard_image(board_id: &str) -> String {
    format!("breadboard/{}.svg", board_id)
}

/// Render the part definition for a resolved board.
pub fn render_fzp(board: &BoardSpecification, resolution: &Resolution) -> Result<String, fmt::Error> {
    let meta = &board.meta;
    let mut fzp = String::new();

    writeln!(fzp, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(fzp, r#"<module moduleId="{}">"#, escape(&meta.id))?;
    writeln!(fzp, "  <version>{}</version>", escape(&meta.version))?;
    writeln!(fzp, "  <author>{}</author>", escape(&meta.author))?;
    writeln!(fzp, "  <title>{}</title>", escape(&meta.title))?;
    writeln!(
        fzp,
        "  <date>{}</date>",
        meta.date.to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    writeln!(fzp, "  <label>{}</label>", escape(&meta.label))?;
    writeln!(fzp, "  <tags/>")?;

    writeln!(fzp, "  <properties>")?;
    writeln!(
        fzp,
        r#"    <property name="size">{}mm X {}mm</property>"#,
        board.width, board.height
    )?;
    writeln!(fzp, r#"    <property name="family">{}</property>"#, FAMILY)?;
    for (name, value) in &meta.properties {
        writeln!(
            fzp,
            r#"    <property name="{}">{}</property>"#,
            escape(name),
            escape(value)
        )?;
    }
    writeln!(fzp, "  </properties>")?;

    writeln!(fzp, "  <taxonomy>{}</taxonomy>", escape(&meta.taxonomy))?;
    writeln!(fzp, "  <description>{}</description>", escape(&meta.description))?;

    let image = breadboard_image(&meta.id);
    writeln!(fzp, "  <views>")?;
    for (view, layer) in VIEWS {
        writeln!(fzp, "    <{}>", view)?;
        writeln!(fzp, r#"      <layers image="{}">"#, escape(&image))?;
        writeln!(fzp, r#"        <layer layerId="{}"/>"#, layer)?;
        writeln!(fzp, "      </layers>")?;
        writeln!(fzp, "    </{}>", view)?;
    }
    writeln!(fzp, "  </views>")?;

    writeln!(fzp, "  <connectors>")?;
    for connector in &resolution.topology.connectors {
        let id = escape(&connector.id);
        writeln!(
            fzp,
            r#"    <connector id="{id}" name="{id}" type="{}">"#,
            connector.kind.as_str()
        )?;
        writeln!(fzp, "      <views>")?;
        writeln!(fzp, "        <breadboardView>")?;
        writeln!(
            fzp,
            r#"          <p layer="breadboard" svgId="{}"/>"#,
            escape(&connector.svg_id)
        )?;
        writeln!(fzp, "        </breadboardView>")?;
        writeln!(fzp, "      </views>")?;
        writeln!(fzp, "    </connector>")?;
    }
    writeln!(fzp, "  </connectors>")?;

    writeln!(fzp, "  <buses>")?;
    for bus in &resolution.topology.buses {
        writeln!(fzp, r#"    <bus id="{}">"#, escape(&bus.id))?;
        for member in &bus.members {
            writeln!(fzp, r#"      <nodeMember connectorId="{}"/>"#, escape(member))?;
        }
        writeln!(fzp, "    </bus>")?;
    }
    writeln!(fzp, "  </buses>")?;

    writeln!(fzp, "</module>")?;
    Ok(fzp)
}
