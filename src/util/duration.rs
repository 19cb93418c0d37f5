//! Utility helpers for representing idle durations in human-readable form.

/// Format a duration in seconds as up to three "N unit" segments.
///
/// Decomposes greedily into days, hours, and minutes. A trailing seconds
/// segment is appended whenever fewer than three segments were produced, so
/// the output is never empty.
pub fn format_duration(total_seconds: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("day", 86_400), ("hour", 3_600), ("minute", 60)];

    let mut remaining = total_seconds;
    let mut segments: Vec<String> = Vec::with_capacity(3);

    for (unit, size) in UNITS {
        let count = remaining / size;
        remaining -= count * size;
        if count > 0 {
            segments.push(segment(count, unit));
        }
    }

    if segments.len() < 3 {
        segments.push(segment(remaining, "second"));
    }

    segments.join(" ")
}

fn segment(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
