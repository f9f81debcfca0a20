//! Terminal detection utilities.
//!
//! Provides functions to detect TTY status, terminal dimensions and colour
//! support, plus a process-wide colour override set from `--color` or the
//! configuration file.

use std::env;
use std::sync::atomic::{AtomicU8, Ordering};

const COLOR_UNSET: u8 = 0;
const COLOR_ON: u8 = 1;
const COLOR_OFF: u8 = 2;

static COLOR_OVERRIDE: AtomicU8 = AtomicU8::new(COLOR_UNSET);

/// Force colour on or off for the rest of the process, or return to
/// detection with `None`.
pub fn set_color_override(choice: Option<bool>) {
    let value = match choice {
        None => COLOR_UNSET,
        Some(true) => COLOR_ON,
        Some(false) => COLOR_OFF,
    };
    COLOR_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Returns the terminal height in rows, or 0 if detection fails.
pub fn terminal_height() -> usize {
    crossterm::terminal::size()
        .map(|(_cols, rows)| rows as usize)
        .unwrap_or(0)
}

/// Determines if ANSI color codes should be used.
///
/// An override set with [`set_color_override`] wins. Otherwise the standard
/// conventions apply:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection
pub fn supports_color() -> bool {
    match COLOR_OVERRIDE.load(Ordering::Relaxed) {
        COLOR_ON => return true,
        COLOR_OFF => return false,
        _ => {}
    }

    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }

    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }

    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }

    is_tty()
}
