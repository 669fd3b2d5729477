//! Document emitters
//!
//! Both emitters read the same [`Resolution`](crate::topology::Resolution),
//! so hole ids and coordinates in the drawing match the connectors in the
//! part definition exactly.

pub mod fzp;
pub mod svg;

use std::borrow::Cow;

pub use fzp::{breadboard_image, render_fzp};
pub use svg::render_svg;

/// Escape text for use in XML character data and double-quoted attributes.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
