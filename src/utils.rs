//! Formatting helpers for command-line output

/// Format a playback offset as `MM:SS.mmm`.
pub fn format_offset(offset_secs: f64) -> String {
    let total_ms = (offset_secs.max(0.0) * 1000.0).round() as u64;
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

/// Render bar heights as a one-line text meter of `width` cells.
///
/// Bars are grouped into cells by maximum; each cell is scaled against
/// `max_height`.
pub fn text_meter(heights: &[f32], width: usize, max_height: f32) -> String {
    const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    if heights.is_empty() || width == 0 || max_height <= 0.0 {
        return String::new();
    }

    let per_cell = heights.len().div_ceil(width);
    heights
        .chunks(per_cell)
        .map(|cell| {
            let peak = cell.iter().copied().fold(0.0f32, f32::max);
            let level = ((peak / max_height).clamp(0.0, 1.0) * 8.0).round() as usize;
            LEVELS[level]
        })
        .collect()
}
