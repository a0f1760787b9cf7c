use std::collections::BTreeMap;

use pdataviewer_chord::config::Config;
use pdataviewer_chord::interaction::Interaction;
use pdataviewer_chord::layout::compute_chord_layout;
use pdataviewer_chord::render::render_svg_with_state;
use pdataviewer_chord::theme::Theme;
use pdataviewer_chord::{ChordData, CohortMetadata, ColorScale, chunk_data};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChordRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    colors: Option<BTreeMap<String, String>>,
    cohorts: Option<CohortMetadata>,
    /// Cohorts of the whole document, in first-seen order, so every chunk
    /// shares one colour domain.
    groups: Option<Vec<String>>,
    hover: Option<usize>,
}

fn build_config(options: &ChordRenderOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("modern") {
        config.theme = Theme::modern();
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    config
}

fn color_scale(options: &ChordRenderOptions, config: &Config, chunk: &ChordData) -> ColorScale {
    if let Some(colors) = &options.colors {
        let (domain, range): (Vec<String>, Vec<String>) = colors
            .iter()
            .map(|(group, color)| (group.clone(), color.clone()))
            .unzip();
        return ColorScale::new(domain, range);
    }
    if let Some(cohorts) = &options.cohorts {
        return ColorScale::from_metadata(cohorts);
    }
    let groups = options.groups.clone().unwrap_or_else(|| chunk.groups());
    ColorScale::new(groups, config.theme.palette.clone())
}

fn chunk_json(data_json: &str, chunk_size: usize) -> Result<String, String> {
    let data: ChordData = serde_json::from_str(data_json).map_err(|error| error.to_string())?;
    serde_json::to_string(&chunk_data(&data, chunk_size)).map_err(|error| error.to_string())
}

fn groups_json(data_json: &str) -> Result<String, String> {
    let data: ChordData = serde_json::from_str(data_json).map_err(|error| error.to_string())?;
    serde_json::to_string(&data.groups()).map_err(|error| error.to_string())
}

fn render_json(chunk_json: &str, options: ChordRenderOptions) -> Result<String, String> {
    let chunk: ChordData = serde_json::from_str(chunk_json).map_err(|error| error.to_string())?;
    let config = build_config(&options);
    let colors = color_scale(&options, &config, &chunk);
    let layout = compute_chord_layout(&chunk, &colors, &config.theme, &config.layout);
    let mut interaction = Interaction::new();
    if let Some(node) = options.hover {
        interaction.mouse_over(node);
    }
    Ok(render_svg_with_state(&layout, &config.theme, &interaction))
}

#[wasm_bindgen]
pub fn chunk_chord_data(data_json: &str, chunk_size: usize) -> Result<String, JsValue> {
    chunk_json(data_json, chunk_size).map_err(|error| JsValue::from_str(&error))
}

/// Distinct cohorts of a whole document, to pass back as the `groups` render
/// option for every chunk.
#[wasm_bindgen]
pub fn chord_groups(data_json: &str) -> Result<String, JsValue> {
    groups_json(data_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_chord_svg(chunk_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChordRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChordRenderOptions::default()
    };

    render_json(chunk_json, options).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{ChordRenderOptions, chunk_json, groups_json, render_json};

    const MAPPINGS: &str = r#"{
        "nodes": [
            {"name": "A", "group": "G1"},
            {"name": "B", "group": "G2"},
            {"name": "C", "group": "G3"}
        ],
        "links": [{"source": "A", "target": "B"}]
    }"#;

    #[test]
    fn chunks_round_trip_through_json() {
        let chunks: serde_json::Value =
            serde_json::from_str(&chunk_json(MAPPINGS, 2).expect("chunking should succeed")).unwrap();
        let chunks = chunks.as_array().expect("chunk list");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0]["links"].as_array().map(Vec::len), Some(1));
        assert_eq!(chunks[1]["links"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn renders_chunk_with_explicit_colors() {
        let options: ChordRenderOptions =
            serde_json::from_str(r##"{"colors": {"G1": "#123456"}, "hover": 0}"##).unwrap();
        let svg = render_json(MAPPINGS, options).expect("chunk should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#123456"));
        assert!(svg.contains(">A</text>"));
    }

    fn legend_color<'a>(svg: &'a str, group: &str) -> Option<&'a str> {
        let row = svg
            .split("<g class=\"legend-row\">")
            .find(|row| row.contains(&format!(">{group}</text>")))?;
        row.split("fill=\"").nth(1)?.split('"').next()
    }

    #[test]
    fn cohort_keeps_its_color_across_chunks() {
        let document = r#"{
            "nodes": [
                {"name": "age", "group": "PPMI"},
                {"name": "age", "group": "BIOFIND"},
                {"name": "sex", "group": "BIOFIND"},
                {"name": "sex", "group": "LuxPARK"}
            ],
            "links": [
                {"source": "age", "target": "age"},
                {"source": "sex", "target": "sex"}
            ]
        }"#;
        let groups: Vec<String> = serde_json::from_str(&groups_json(document).unwrap()).unwrap();
        assert_eq!(groups, vec!["PPMI", "BIOFIND", "LuxPARK"]);

        let chunks: Vec<serde_json::Value> =
            serde_json::from_str(&chunk_json(document, 2).unwrap()).unwrap();
        assert_eq!(chunks.len(), 2);

        let options = || ChordRenderOptions {
            groups: Some(groups.clone()),
            ..Default::default()
        };
        let first = render_json(&chunks[0].to_string(), options()).unwrap();
        let second = render_json(&chunks[1].to_string(), options()).unwrap();
        assert_eq!(legend_color(&first, "BIOFIND"), Some("#ff7f0e"));
        assert_eq!(legend_color(&first, "BIOFIND"), legend_color(&second, "BIOFIND"));
        assert_eq!(legend_color(&second, "LuxPARK"), Some("#2ca02c"));
    }

    #[test]
    fn rejects_malformed_chunks() {
        assert!(render_json("{\"nodes\": 3}", ChordRenderOptions::default()).is_err());
    }
}
