use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordNode {
    pub name: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ChordNode {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            id: None,
        }
    }

    /// Composite identity used by the partitioner. Two nodes sharing a name
    /// but living in different groups are different graph vertices.
    pub fn key(&self) -> String {
        format!("{}|{}", self.name, self.group)
    }

    /// Display id assigned during layout preparation.
    pub fn display_id(&self) -> String {
        format!("{}_{}", self.name, self.group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordLink {
    pub source: String,
    pub target: String,
}

impl ChordLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordData {
    #[serde(default)]
    pub nodes: Vec<ChordNode>,
    #[serde(default)]
    pub links: Vec<ChordLink>,
}

impl ChordData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push_node(&mut self, name: &str, group: &str) {
        self.nodes.push(ChordNode::new(name, group));
    }

    pub fn push_link(&mut self, source: &str, target: &str) {
        self.links.push(ChordLink::new(source, target));
    }

    /// Distinct groups in first-seen order.
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for node in &self.nodes {
            if !groups.iter().any(|group| group == &node.group) {
                groups.push(node.group.clone());
            }
        }
        groups
    }
}

/// One cohort entry of the metadata document. Only the colour is consumed;
/// every other field rides along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortInfo {
    #[serde(rename = "Color", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

pub type CohortMetadata = BTreeMap<String, CohortInfo>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_shape() {
        let raw = r#"{
            "nodes": [{"name": "age", "group": "PPMI"}, {"name": "age", "group": "BIOFIND"}],
            "links": [{"source": "age", "target": "age"}]
        }"#;
        let data: ChordData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.nodes[0].id, None);
        assert_eq!(data.nodes[1].key(), "age|BIOFIND");
        assert_eq!(data.nodes[1].display_id(), "age_BIOFIND");
        assert_eq!(data.groups(), vec!["PPMI", "BIOFIND"]);
    }

    #[test]
    fn cohort_metadata_keeps_unknown_fields() {
        let raw = r##"{
            "PPMI": {"Participants": 1758, "Location": "USA, Europe", "Color": "#1f77b4"},
            "LuxPARK": {"Participants": 1000}
        }"##;
        let meta: CohortMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta["PPMI"].color.as_deref(), Some("#1f77b4"));
        assert_eq!(meta["PPMI"].extra["Participants"], serde_json::json!(1758));
        assert!(meta["LuxPARK"].color.is_none());
    }
}
