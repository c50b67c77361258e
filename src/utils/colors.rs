/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Delta color:
/// \>0 → green
/// \<0 → red
/// 0 → reset
pub fn color_for_delta(value: i64) -> &'static str {
    if value > 0 {
        GREEN
    } else if value < 0 {
        RED
    } else {
        RESET
    }
}

/// Green for IN, grey for OUT.
pub fn color_for_state(is_in: bool) -> &'static str {
    if is_in { GREEN } else { GREY }
}
