use std::f32::consts::PI;

use super::{NodeLabelLayout, TextAnchor};

// (max label length, px); anything longer falls through to the floor.
const LABEL_FONT_STEPS: [(usize, f32); 5] = [(20, 15.0), (30, 14.0), (40, 13.0), (50, 12.0), (60, 11.0)];
const LABEL_FONT_FLOOR: f32 = 10.0;

/// Longer labels get smaller type so neighbours on the rim overlap less.
pub(super) fn label_font_size(text: &str) -> f32 {
    let len = text.chars().count();
    LABEL_FONT_STEPS
        .iter()
        .find(|(limit, _)| len <= *limit)
        .map(|(_, size)| *size)
        .unwrap_or(LABEL_FONT_FLOOR)
}

pub(super) fn node_label(text: &str, start_angle: f32, end_angle: f32, radius: f32) -> NodeLabelLayout {
    let angle = (start_angle + end_angle) / 2.0;
    let flipped = angle > PI;
    NodeLabelLayout {
        text: text.to_string(),
        angle,
        rotate_deg: angle.to_degrees() - 90.0,
        radius,
        flipped,
        anchor: if flipped { TextAnchor::End } else { TextAnchor::Start },
        font_size: label_font_size(text),
    }
}
