//! ANSI colours for single-value terminal output.

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// Green for a true flag, red for false.
pub fn colorize_flag(value: bool, yes: &str, no: &str) -> String {
    if value {
        format!("{GREEN}{yes}{RESET}")
    } else {
        format!("{RED}{no}{RESET}")
    }
}
