use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::Path;

use crate::error::{ChordError, Result};
use crate::ir::{ChordData, CohortMetadata};

fn read_document(path: Option<&Path>, context: &str) -> Result<String> {
    if let Some(path) = path.filter(|path| *path != Path::new("-")) {
        return std::fs::read_to_string(path)
            .map_err(|err| ChordError::upstream(format!("{context} from {}", path.display()), err));
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|err| ChordError::upstream(format!("{context} from stdin"), err))?;
    Ok(buf)
}

/// Reads a chord document from `path`, or stdin when `path` is `None` or `-`.
pub fn load_chord_data(path: Option<&Path>) -> Result<ChordData> {
    let contents = read_document(path, "chord data")?;
    parse_chord_data(&contents)
}

pub fn parse_chord_data(contents: &str) -> Result<ChordData> {
    let data: ChordData =
        serde_json::from_str(contents).map_err(|err| ChordError::upstream("chord data", err))?;
    log::debug!(
        "loaded chord data: {} nodes, {} links",
        data.nodes.len(),
        data.links.len()
    );
    Ok(data)
}

pub fn load_cohort_metadata(path: &Path) -> Result<CohortMetadata> {
    let contents = read_document(Some(path), "cohort metadata")?;
    parse_cohort_metadata(&contents)
}

pub fn parse_cohort_metadata(contents: &str) -> Result<CohortMetadata> {
    serde_json::from_str(contents).map_err(|err| ChordError::upstream("cohort metadata", err))
}

pub fn chunks_to_json(chunks: &[ChordData]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(chunks)?)
}

pub fn write_chunks(path: &Path, chunks: &[ChordData]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, chunks)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chord_document() {
        let data = parse_chord_data(
            r#"{"nodes":[{"name":"age","group":"PPMI"},{"name":"age","group":"LuxPARK"}],
                "links":[{"source":"age","target":"age"}]}"#,
        )
        .unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.links[0].source, "age");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let data = parse_chord_data(r#"{"nodes":[]}"#).unwrap();
        assert!(data.is_empty());
        assert!(data.links.is_empty());
    }

    #[test]
    fn malformed_document_is_upstream_failure() {
        let err = parse_chord_data("{nodes:").unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("chord data"));
    }

    #[test]
    fn missing_file_is_upstream_failure() {
        let err = load_cohort_metadata(Path::new("/nonexistent/cohorts.json")).unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn parses_cohort_metadata_colors() {
        let metadata = parse_cohort_metadata(
            r##"{"PPMI":{"Color":"#1f77b4","Participants":1758},"LuxPARK":{"Location":"LU"}}"##,
        )
        .unwrap();
        assert_eq!(metadata["PPMI"].color.as_deref(), Some("#1f77b4"));
        assert_eq!(metadata["LuxPARK"].color, None);
    }

    #[test]
    fn chunk_list_is_json_exportable() {
        let mut chunk = ChordData::new();
        chunk.push_node("A", "G1");
        let json = chunks_to_json(&[chunk.clone()]).unwrap();
        let back: Vec<ChordData> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![chunk]);
    }
}
