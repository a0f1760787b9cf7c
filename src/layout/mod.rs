mod chord;
mod groups;
mod text;
pub(crate) mod types;
pub use chord::ChordSet;
pub use types::*;
use chord::*;
use groups::*;
use text::*;

use std::collections::HashMap;

use crate::color::ColorLookup;
use crate::config::LayoutConfig;
use crate::ir::{ChordData, ChordLink};
use crate::theme::{Theme, darker};

/// Assigns display ids and orders nodes by group. The sort is stable, so
/// nodes of one group keep their chunk order.
pub fn prepare_nodes(chunk: &ChordData) -> Vec<PreparedNode> {
    let mut nodes: Vec<PreparedNode> = chunk
        .nodes
        .iter()
        .map(|node| PreparedNode {
            index: 0,
            id: node.display_id(),
            name: node.name.clone(),
            group: node.group.clone(),
        })
        .collect();
    nodes.sort_by(|a, b| a.group.cmp(&b.group));
    for (idx, node) in nodes.iter_mut().enumerate() {
        node.index = idx;
    }
    nodes
}

/// Binary, symmetric adjacency between prepared nodes. Links resolve by name
/// on both ends; pairs inside the same group are left at zero.
pub fn build_matrix(nodes: &[PreparedNode], links: &[ChordLink]) -> Vec<Vec<f32>> {
    let n = nodes.len();
    let mut matrix = vec![vec![0.0f32; n]; n];
    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for node in nodes {
        by_name.entry(node.name.as_str()).or_default().push(node.index);
    }

    for link in links {
        let (Some(sources), Some(targets)) = (
            by_name.get(link.source.as_str()),
            by_name.get(link.target.as_str()),
        ) else {
            continue;
        };
        for &s in sources {
            for &t in targets {
                if nodes[s].group != nodes[t].group {
                    matrix[s][t] = 1.0;
                    matrix[t][s] = 1.0;
                }
            }
        }
    }

    matrix
}

pub fn compute_chord_layout(
    chunk: &ChordData,
    colors: &dyn ColorLookup,
    theme: &Theme,
    config: &LayoutConfig,
) -> ChordLayout {
    let prepared = prepare_nodes(chunk);
    let matrix = build_matrix(&prepared, &chunk.links);
    let chords = compute_chords(&matrix, config.pad_angle);
    let group_colors = resolve_group_colors(&prepared, colors, theme);

    let outer_radius = config.outer_radius();
    let inner_radius = config.inner_radius();
    let label_radius = outer_radius + config.node_label_offset;

    let nodes: Vec<NodeArcLayout> = prepared
        .iter()
        .zip(&chords.groups)
        .map(|(node, segment)| {
            let fill = group_colors
                .get(&node.group)
                .cloned()
                .unwrap_or_else(|| theme.fallback_group_color.clone());
            NodeArcLayout {
                index: node.index,
                id: node.id.clone(),
                name: node.name.clone(),
                group: node.group.clone(),
                start_angle: segment.start_angle,
                end_angle: segment.end_angle,
                value: segment.value,
                inner_radius,
                outer_radius,
                stroke: darker(&fill, 1.0),
                fill,
                label: node_label(&node.name, segment.start_angle, segment.end_angle, label_radius),
            }
        })
        .collect();

    let groups = compute_group_arcs(&nodes, &group_colors, theme, config, outer_radius);
    let legend = compute_legend(&group_colors, theme, config);
    let ribbons = chords
        .chords
        .iter()
        .enumerate()
        .map(|(index, chord)| RibbonLayout {
            index,
            chord: *chord,
            radius: inner_radius,
        })
        .collect::<Vec<_>>();

    let width = config.width + config.viewbox_padding;
    let height = config.height + config.viewbox_padding;
    log::debug!(
        "chord layout: {} nodes, {} groups, {} ribbons",
        nodes.len(),
        groups.len(),
        ribbons.len()
    );

    ChordLayout {
        id_prefix: "chord".to_string(),
        width,
        height,
        center: (width / 2.0, height / 2.0),
        inner_radius,
        outer_radius,
        matrix,
        nodes,
        groups,
        ribbons,
        legend,
        transition_ms: config.transition_ms,
    }
}
