use crate::layout::ChordLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub id_prefix: String,
    pub width: f32,
    pub height: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub matrix: Vec<Vec<f32>>,
    pub nodes: Vec<NodeDump>,
    pub groups: Vec<GroupDump>,
    pub ribbons: Vec<RibbonDump>,
    pub legend: Vec<LegendDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub group: String,
    pub start_angle: f32,
    pub end_angle: f32,
    pub value: f32,
    pub fill: String,
    pub label_transform: String,
    pub label_anchor: String,
    pub label_font_size: f32,
}

#[derive(Debug, Serialize)]
pub struct GroupDump {
    pub index: usize,
    pub group: String,
    pub start_angle: f32,
    pub end_angle: f32,
    pub fill: String,
    pub nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RibbonDump {
    pub source: String,
    pub target: String,
    pub source_angles: [f32; 2],
    pub target_angles: [f32; 2],
}

#[derive(Debug, Serialize)]
pub struct LegendDump {
    pub group: String,
    pub color: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &ChordLayout) -> Self {
        let node_id = |idx: usize| {
            layout
                .nodes
                .get(idx)
                .map(|node| node.id.clone())
                .unwrap_or_default()
        };

        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                group: node.group.clone(),
                start_angle: node.start_angle,
                end_angle: node.end_angle,
                value: node.value,
                fill: node.fill.clone(),
                label_transform: node.label.transform(),
                label_anchor: node.label.anchor.as_svg().to_string(),
                label_font_size: node.label.font_size,
            })
            .collect();

        let groups = layout
            .groups
            .iter()
            .map(|group| GroupDump {
                index: group.index,
                group: group.group.clone(),
                start_angle: group.start_angle,
                end_angle: group.end_angle,
                fill: group.fill.clone(),
                nodes: group.nodes.iter().map(|idx| node_id(*idx)).collect(),
            })
            .collect();

        let ribbons = layout
            .ribbons
            .iter()
            .map(|ribbon| {
                let chord = &ribbon.chord;
                RibbonDump {
                    source: node_id(chord.source.index),
                    target: node_id(chord.target.index),
                    source_angles: [chord.source.start_angle, chord.source.end_angle],
                    target_angles: [chord.target.start_angle, chord.target.end_angle],
                }
            })
            .collect();

        let legend = layout
            .legend
            .iter()
            .map(|item| LegendDump {
                group: item.group.clone(),
                color: item.color.clone(),
            })
            .collect();

        LayoutDump {
            id_prefix: layout.id_prefix.clone(),
            width: layout.width,
            height: layout.height,
            inner_radius: layout.inner_radius,
            outer_radius: layout.outer_radius,
            matrix: layout.matrix.clone(),
            nodes,
            groups,
            ribbons,
            legend,
        }
    }
}

pub fn write_layout_dump(path: &Path, layouts: &[ChordLayout]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dumps: Vec<LayoutDump> = layouts.iter().map(LayoutDump::from_layout).collect();
    serde_json::to_writer_pretty(writer, &dumps)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScale;
    use crate::config::LayoutConfig;
    use crate::ir::ChordData;
    use crate::layout::compute_chord_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_names_ribbon_ends_by_display_id() {
        let mut chunk = ChordData::new();
        chunk.push_node("sex", "PPMI");
        chunk.push_node("gender", "BIOFIND");
        chunk.push_link("sex", "gender");
        let layout = compute_chord_layout(
            &chunk,
            &ColorScale::default(),
            &Theme::dashboard(),
            &LayoutConfig::default(),
        );
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.nodes[0].id, "gender_BIOFIND");
        assert_eq!(dump.ribbons.len(), 1);
        let mut ends = vec![dump.ribbons[0].source.as_str(), dump.ribbons[0].target.as_str()];
        ends.sort();
        assert_eq!(ends, vec!["gender_BIOFIND", "sex_PPMI"]);
        assert_eq!(dump.groups[1].nodes, vec!["sex_PPMI".to_string()]);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["legend"].as_array().map(|rows| rows.len()), Some(2));
    }
}
