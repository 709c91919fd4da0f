//! Stable colours for thread states and chart series.

/// Colour for a thread state. Well-known states have fixed colours; anything
/// else gets a hue derived from its name, so the same state is always drawn
/// the same way across panels.
pub fn state_color(state: &str) -> String {
    match state {
        "RUNNABLE" => "#2ecc71".to_string(),
        "BLOCKED" => "#e74c3c".to_string(),
        "WAITING" => "#f1c40f".to_string(),
        "TIMED_WAITING" => "#e67e22".to_string(),
        "NEW" => "#3498db".to_string(),
        "TERMINATED" => "#95a5a6".to_string(),
        "UNKNOWN" => "#4b5563".to_string(),
        other => format!("hsl({}, 65%, 55%)", name_hue(other)),
    }
}

const SERIES: [&str; 8] = [
    "#3b82f6", "#f97316", "#10b981", "#a855f7", "#ef4444", "#14b8a6", "#eab308", "#ec4899",
];

/// Colour for the `index`-th series of a chart.
pub fn series_color(index: usize) -> &'static str {
    SERIES[index % SERIES.len()]
}

fn name_hue(name: &str) -> u32 {
    // FNV-1a
    let mut hash: u32 = 0x811c_9dc5;
    for byte in name.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash % 360
}
