use serde::Serialize;

/// A node after layout preparation: display id assigned, position fixed by
/// the group sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedNode {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub group: String,
}

/// Angular extent of one node's segment on the circle. Angles are radians,
/// zero at twelve o'clock, growing clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChordGroup {
    pub index: usize,
    pub start_angle: f32,
    pub end_angle: f32,
    pub value: f32,
}

/// One end of a chord: the sub-range of node `index`'s segment it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChordEnd {
    pub index: usize,
    pub start_angle: f32,
    pub end_angle: f32,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Chord {
    pub source: ChordEnd,
    pub target: ChordEnd,
}

impl Chord {
    pub fn touches(&self, node: usize) -> bool {
        self.source.index == node || self.target.index == node
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLabelLayout {
    pub text: String,
    pub angle: f32,
    pub rotate_deg: f32,
    pub radius: f32,
    pub flipped: bool,
    pub anchor: TextAnchor,
    pub font_size: f32,
}

impl NodeLabelLayout {
    pub fn transform(&self) -> String {
        let flip = if self.flipped { " rotate(180)" } else { "" };
        format!(
            "rotate({:.2}) translate({:.2}){}",
            self.rotate_deg, self.radius, flip
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeArcLayout {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub group: String,
    pub start_angle: f32,
    pub end_angle: f32,
    pub value: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub fill: String,
    pub stroke: String,
    pub label: NodeLabelLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupLabelLayout {
    pub text: String,
    pub radius: f32,
    pub start_offset: String,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupArcLayout {
    pub index: usize,
    pub group: String,
    pub start_angle: f32,
    pub end_angle: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub fill: String,
    pub nodes: Vec<usize>,
    pub label: GroupLabelLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RibbonLayout {
    pub index: usize,
    pub chord: Chord,
    pub radius: f32,
}

impl RibbonLayout {
    pub fn touches(&self, node: usize) -> bool {
        self.chord.touches(node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub group: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub swatch_size: f32,
}

/// Declarative drawing plan for one chunk. Everything needed to paint the
/// diagram lives here; applying it to a surface is the renderer's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordLayout {
    pub id_prefix: String,
    pub width: f32,
    pub height: f32,
    pub center: (f32, f32),
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub matrix: Vec<Vec<f32>>,
    pub nodes: Vec<NodeArcLayout>,
    pub groups: Vec<GroupArcLayout>,
    pub ribbons: Vec<RibbonLayout>,
    pub legend: Vec<LegendItem>,
    pub transition_ms: u32,
}

impl ChordLayout {
    pub fn node_label_id(&self, node: usize) -> String {
        format!("{}_node_{}", self.id_prefix, node)
    }

    pub fn group_label_path_id(&self, group: usize) -> String {
        format!("{}_group_label_path_{}", self.id_prefix, group)
    }
}
