//! Deterministic palette assignment for visual grouping.
//!
//! # Responsibility
//! - Map node ids onto a fixed palette so siblings share a hue.
//!
//! # Invariants
//! - Pure functions of their inputs; re-running yields identical colors.
//! - `color_override` is the only way a node escapes the hash palette.

use crate::model::graph::NodeKind;

/// Fixed display palette. Siblings of the same parent share one entry.
pub const PALETTE: [&str; 10] = [
    "#facc15", // yellow
    "#fb7185", // pink
    "#22d3ee", // cyan
    "#a3e635", // lime
    "#c084fc", // purple
    "#fb923c", // orange
    "#f87171", // red
    "#4ade80", // green
    "#60a5fa", // blue
    "#f472b6", // fuchsia
];

/// Hashes a string into the palette.
///
/// Rolling `code + (hash << 5) - hash` over UTF-16 code units, kept in 32-bit
/// wrapping arithmetic so ids hash identically across platforms.
pub fn color_by_hash(s: &str) -> &'static str {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = (unit as i32).wrapping_add((hash << 5).wrapping_sub(hash));
    }
    PALETTE[hash.unsigned_abs() as usize % PALETTE.len()]
}

/// Resolves the display color for a node.
///
/// Override wins; root and top-level nodes hash their own id; everything else
/// hashes its layout-parent id so sibling groups share a hue.
pub fn node_color(
    node_id: &str,
    layout_parent_id: Option<&str>,
    kind: NodeKind,
    color_override: Option<&str>,
) -> String {
    if let Some(color) = color_override {
        return color.to_string();
    }
    match layout_parent_id {
        Some(parent) if kind != NodeKind::Root => color_by_hash(parent).to_string(),
        _ => color_by_hash(node_id).to_string(),
    }
}

/// Scales the RGB channels of a `#rrggbb` color, clamping at full intensity.
///
/// Returns the input unchanged when it is not a 6-digit hex color.
pub fn adjust_brightness(hex_color: &str, factor: f64) -> String {
    let hex = hex_color.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex_color.to_string();
    }
    let channels: Option<Vec<u8>> = (0..3)
        .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok())
        .collect();
    match channels {
        Some(rgb) => {
            let scaled: Vec<u8> = rgb
                .iter()
                .map(|&c| ((c as f64 * factor).floor().min(255.0)).max(0.0) as u8)
                .collect();
            format!("#{:02x}{:02x}{:02x}", scaled[0], scaled[1], scaled[2])
        }
        None => hex_color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{adjust_brightness, color_by_hash, node_color, PALETTE};
    use crate::model::graph::NodeKind;

    #[test]
    fn hash_is_stable_and_in_palette() {
        let first = color_by_hash("music");
        assert_eq!(first, color_by_hash("music"));
        assert!(PALETTE.contains(&first));
    }

    #[test]
    fn siblings_share_parent_hue() {
        let a = node_color("rock", Some("music"), NodeKind::Category, None);
        let b = node_color("jazz", Some("music"), NodeKind::Category, None);
        assert_eq!(a, b);
        assert_eq!(a, color_by_hash("music"));
    }

    #[test]
    fn roots_hash_their_own_id() {
        let color = node_color("music", Some("viewer"), NodeKind::Root, None);
        assert_eq!(color, color_by_hash("music"));
    }

    #[test]
    fn override_wins_over_hash() {
        let color = node_color("rock", Some("music"), NodeKind::Category, Some("#000000"));
        assert_eq!(color, "#000000");
    }

    #[test]
    fn brightness_scales_and_clamps() {
        assert_eq!(adjust_brightness("#808080", 2.0), "#ffffff");
        assert_eq!(adjust_brightness("#204060", 0.5), "#102030");
        assert_eq!(adjust_brightness("not-a-color", 0.5), "not-a-color");
    }
}
