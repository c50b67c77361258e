//! Formatting utilities used for CLI outputs.

/// Signed `+HHh MMm` / `-HHh MMm` (or `+HH:MM` when `short`).
pub fn secs2readable(secs: i64, want_sign: bool, short: bool) -> String {
    let abs_m = secs.abs() / 60;
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if secs > 0 && want_sign {
        "+"
    } else if secs < 0 && want_sign {
        "-"
    } else {
        "" // zero: no sign
    };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}
