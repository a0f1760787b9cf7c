use std::collections::HashMap;

use crate::color::ColorLookup;
use crate::config::LayoutConfig;
use crate::theme::Theme;

use super::{GroupArcLayout, GroupLabelLayout, LegendItem, NodeArcLayout, PreparedNode};

pub(super) fn resolve_group_colors(
    nodes: &[PreparedNode],
    colors: &dyn ColorLookup,
    theme: &Theme,
) -> HashMap<String, String> {
    let mut resolved = HashMap::new();
    for node in nodes {
        if resolved.contains_key(&node.group) {
            continue;
        }
        let color = colors.color_for(&node.group).unwrap_or_else(|| {
            log::warn!(
                "no colour for group `{}`, falling back to {}",
                node.group,
                theme.fallback_group_color
            );
            theme.fallback_group_color.clone()
        });
        resolved.insert(node.group.clone(), color);
    }
    resolved
}

/// One ring segment per group, covering the segments of all of its nodes.
/// Groups keep the order in which they appear around the circle.
pub(super) fn compute_group_arcs(
    nodes: &[NodeArcLayout],
    group_colors: &HashMap<String, String>,
    theme: &Theme,
    config: &LayoutConfig,
    outer_radius: f32,
) -> Vec<GroupArcLayout> {
    let inner = outer_radius + config.group_arc_gap;
    let outer = inner + config.group_arc_thickness;
    let mut arcs: Vec<GroupArcLayout> = Vec::new();

    for node in nodes {
        if let Some(arc) = arcs.iter_mut().find(|arc| arc.group == node.group) {
            arc.start_angle = arc.start_angle.min(node.start_angle);
            arc.end_angle = arc.end_angle.max(node.end_angle);
            arc.nodes.push(node.index);
            continue;
        }
        let fill = group_colors
            .get(&node.group)
            .cloned()
            .unwrap_or_else(|| theme.fallback_group_color.clone());
        arcs.push(GroupArcLayout {
            index: arcs.len(),
            group: node.group.clone(),
            start_angle: node.start_angle,
            end_angle: node.end_angle,
            inner_radius: inner,
            outer_radius: outer,
            fill,
            nodes: vec![node.index],
            label: GroupLabelLayout {
                text: node.group.clone(),
                radius: outer + config.group_label_offset,
                start_offset: config.group_label_start_offset.clone(),
                font_size: theme.group_label_font_size,
            },
        });
    }

    arcs
}

pub(super) fn compute_legend(
    group_colors: &HashMap<String, String>,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<LegendItem> {
    let mut groups: Vec<&String> = group_colors.keys().collect();
    groups.sort();
    groups
        .into_iter()
        .enumerate()
        .map(|(idx, group)| LegendItem {
            group: group.clone(),
            color: group_colors
                .get(group)
                .cloned()
                .unwrap_or_else(|| theme.fallback_group_color.clone()),
            x: config.legend_x,
            y: config.legend_y + idx as f32 * config.legend_row_height,
            swatch_size: config.legend_swatch_size,
        })
        .collect()
}
