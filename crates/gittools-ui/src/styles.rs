//! Colour theme and styling functions for gittools output.
//!
//! Uses the Ayu Dark palette. Object ids take the yellow git itself uses
//! for commit ids; names are coloured by where they come from so that a
//! reflog-only or dangling name stands out from a branch or tag.

use gittools_core::naming::SourceKind;
use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue

const OBJECT_ID: (u8, u8, u8) = (0xe6, 0xb4, 0x50); // #e6b450 - muted gold
const NAME_REF: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // green
const NAME_HEAD: (u8, u8, u8) = (0x95, 0xe6, 0xcb); // #95e6cb - cyan
const NAME_REFLOG: (u8, u8, u8) = (0xd2, 0xa6, 0xff); // #d2a6ff - purple
const NAME_DANGLING: (u8, u8, u8) = (0xf2, 0x6d, 0x78); // #f26d78 - red

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_PASS: &str = "\u{2713}"; // check mark
pub const ICON_STEP: &str = "\u{2192}"; // rightwards arrow

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

pub fn render_step_icon() -> String {
    color_str(ICON_STEP, ACCENT)
}

// ---------------------------------------------------------------------------
// Object rendering
// ---------------------------------------------------------------------------

/// Renders an object id (full or abbreviated).
pub fn render_object_id(id: &str) -> String {
    color_str(id, OBJECT_ID)
}

/// Renders the heading id of a reported object in bold.
pub fn render_object_heading(id: &str) -> String {
    color_bold_str(id, OBJECT_ID)
}

/// Renders a name coloured by the kind of source it descends from.
pub fn render_name(text: &str, kind: SourceKind) -> String {
    let rgb = match kind {
        SourceKind::Ref => NAME_REF,
        SourceKind::Head => NAME_HEAD,
        SourceKind::Reflog => NAME_REFLOG,
        SourceKind::Dangling => NAME_DANGLING,
    };
    color_str(text, rgb)
}

/// Renders the `(unnamed)` placeholder for an object without names.
pub fn render_unnamed() -> String {
    render_muted("(unnamed)")
}

/// Renders the `[dangling]` marker.
pub fn render_dangling_badge() -> String {
    color_bold_str("[dangling]", FAIL)
}

/// Renders a row label (`name`, `parent`, `child`) padded to a fixed width.
pub fn render_label(label: &str) -> String {
    render_muted(&format!("{label:<8}"))
}
