//! Formatting utilities used for CLI outputs.

/// Human readable byte size: `1536` → `1.5 KB`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Join tags for display: `["Walking", "Outdoor"]` → `Walking, Outdoor`.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
