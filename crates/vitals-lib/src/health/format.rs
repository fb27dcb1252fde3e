//! Human-readable rendering of resource figures

/// Binary unit prefixes for 1024-step scaling
const UNIT_PREFIXES: &[u8] = b"KMGTPE";

/// Render a byte count with a binary unit prefix.
///
/// Values below 1024 render as `"<n> B"`; larger values are scaled by the
/// largest fitting power of 1024 and rendered with two decimal places,
/// e.g. `"1.50 KB"`, `"2.00 MB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let exp = bytes.ilog(1024);
    let prefix = UNIT_PREFIXES[(exp - 1) as usize] as char;
    format!("{:.2} {}B", bytes as f64 / 1024f64.powi(exp as i32), prefix)
}

/// Render a process uptime given in milliseconds as a compact duration,
/// starting at the largest non-zero unit: `"1d 1h 0m 0s"`, `"1m 1s"`, `"0s"`.
pub fn format_uptime(uptime_ms: u64) -> String {
    let seconds = uptime_ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Render a usage percentage with two decimal places and a trailing `%`.
pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

/// Render a one-minute load average with one decimal place, or `"N/A"` when
/// the host reports a negative value (load averages are unavailable there).
pub fn format_load_average(load: f64) -> String {
    if load < 0.0 {
        "N/A".to_string()
    } else {
        format!("{:.1}", load)
    }
}
