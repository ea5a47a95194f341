//! Time display helpers.
//!
//! Converts playback positions in seconds to the short clock strings shown
//! next to the loop handles and in the transport bar, and back.

/// Format a position in seconds as `m:ss`, or `h:mm:ss` from one hour on.
///
/// Negative, NaN and infinite values render as `0:00`.
///
/// # Arguments
/// * `seconds` - Position in seconds
///
/// # Returns
/// The clock string, seconds truncated (not rounded)
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let total_secs = seconds as u64;
    let hrs = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hrs > 0 {
        format!("{}:{:02}:{:02}", hrs, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Parse a clock string back into seconds.
///
/// Accepts `ss`, `m:ss` and `h:mm:ss`. The last component may carry a
/// fraction (`1:05.5`). Minutes and seconds after the first component must
/// be below 60.
///
/// # Returns
/// `Some(seconds)` for a well-formed string, `None` otherwise
pub fn parse_time(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let (last, leading) = parts.split_last()?;
    let secs: f64 = last.parse().ok()?;
    if !secs.is_finite() || secs < 0.0 || (!leading.is_empty() && secs >= 60.0) {
        return None;
    }

    let mut total = 0.0;
    for (i, part) in leading.iter().enumerate() {
        let value: u64 = part.parse().ok()?;
        // Only the leading component may exceed 59
        if i > 0 && value >= 60 {
            return None;
        }
        total = total * 60.0 + value as f64;
    }

    Some(total * 60.0 + secs)
}

/// Format a playback rate as shown on the speed buttons (`1x`, `0.25x`).
pub fn format_rate(rate: f64) -> String {
    format!("{}x", rate)
}
