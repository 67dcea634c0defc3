//! Terminal output for the `cmlre` binary: semantic colors, message
//! helpers and tables.
//!
//! Whether output is colored is decided once at startup by [`init`].

use std::ffi::OsString;
use std::io::IsTerminal;
use std::sync::OnceLock;

pub mod colors;
pub mod output;
pub mod table;

pub use output::*;
pub use table::*;

static PLAIN: OnceLock<bool> = OnceLock::new();

/// Fixes the color mode for the rest of the process.
///
/// Output is plain when `--no-color` is given, when `NO_COLOR` is set to a
/// non-empty value, or when stdout is not a terminal.
pub fn init(no_color_flag: bool) {
    let plain = plain_output(
        no_color_flag,
        std::env::var_os("NO_COLOR"),
        std::io::stdout().is_terminal(),
    );
    let _ = PLAIN.set(plain);
}

/// True when styling must be skipped.
pub fn plain() -> bool {
    PLAIN.get().copied().unwrap_or(false)
}

fn plain_output(flag: bool, no_color_env: Option<OsString>, stdout_is_tty: bool) -> bool {
    flag || no_color_env.is_some_and(|v| !v.is_empty()) || !stdout_is_tty
}
