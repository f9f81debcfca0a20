//! Output helpers: JSON, plain text and paged text.

use std::io::{self, Write};

use serde::Serialize;

/// Print `value` as pretty JSON followed by a newline.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print text, through the pager when `paged` and the text is long.
pub fn output_text(content: &str, paged: bool) {
    if paged {
        gittools_ui::pager::page(content);
    } else {
        let _ = io::stdout().lock().write_all(content.as_bytes());
    }
}
