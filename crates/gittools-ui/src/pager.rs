//! Pager support for long reports.
//!
//! Pipes content through `$GIT_PAGER`, `$PAGER` or `less -FRX` when it
//! does not fit on the screen, following the same variables git itself
//! honours.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::terminal::{is_tty, terminal_height};

/// Returns `true` if the content exceeds the terminal height and should be paged.
///
/// Returns `false` if:
/// - `GITTOOLS_NO_PAGER` environment variable is set
/// - stdout is not a TTY
/// - terminal height cannot be determined
/// - content fits within the terminal
pub fn should_page(content: &str) -> bool {
    if env::var_os("GITTOOLS_NO_PAGER").is_some() {
        return false;
    }

    if !is_tty() {
        return false;
    }

    let height = terminal_height();
    if height == 0 {
        return false;
    }

    // Leave one line for the shell prompt.
    content_line_count(content) > height.saturating_sub(1)
}

/// Pipes content through a pager if appropriate, otherwise prints directly.
///
/// When the pager is `less` and `LESS` is unset, `LESS=FRX` is exported so
/// colours survive and short output does not wait for a keypress.
pub fn page(content: &str) {
    if !should_page(content) {
        print!("{content}");
        return;
    }

    let pager_cmd = get_pager_command();
    let parts: Vec<&str> = pager_cmd.split_whitespace().collect();
    let Some((program, args)) = parts.split_first() else {
        print!("{content}");
        return;
    };
    // `cat` (or an empty GIT_PAGER) means no paging, as in git.
    if *program == "cat" {
        print!("{content}");
        return;
    }

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    if env::var_os("LESS").is_none() {
        cmd.env("LESS", "FRX");
    }

    match cmd.spawn() {
        Ok(mut child) => {
            if let Some(ref mut stdin) = child.stdin {
                // Ignore write errors (e.g. broken pipe when user quits pager).
                let _ = stdin.write_all(content.as_bytes());
            }
            drop(child.stdin.take());
            let _ = child.wait();
        }
        Err(_) => {
            print!("{content}");
        }
    }
}

/// Returns the pager command to use.
/// Checks `GIT_PAGER`, then `PAGER`, defaults to `"less"`.
fn get_pager_command() -> String {
    if let Ok(pager) = env::var("GIT_PAGER") {
        // An explicitly empty GIT_PAGER disables paging.
        return if pager.is_empty() { "cat".to_string() } else { pager };
    }
    if let Ok(pager) = env::var("PAGER") {
        if !pager.is_empty() {
            return pager;
        }
    }
    "less".to_string()
}

fn content_line_count(content: &str) -> usize {
    content.lines().count()
}
