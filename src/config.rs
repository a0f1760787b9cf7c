use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CHUNK_SIZE: usize = 40;
pub const DEFAULT_MOUNT_HOOK: &str = "chord-diagram";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub arc_thickness: f32,
    pub viewbox_padding: f32,
    pub pad_angle: f32,
    pub node_label_offset: f32,
    pub group_arc_gap: f32,
    pub group_arc_thickness: f32,
    pub group_label_offset: f32,
    pub group_label_start_offset: String,
    pub legend_x: f32,
    pub legend_y: f32,
    pub legend_row_height: f32,
    pub legend_swatch_size: f32,
    pub transition_ms: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            margin: 60.0,
            arc_thickness: 30.0,
            viewbox_padding: 200.0,
            pad_angle: 0.06,
            node_label_offset: 20.0,
            group_arc_gap: 4.0,
            group_arc_thickness: 10.0,
            group_label_offset: 8.0,
            group_label_start_offset: "25%".to_string(),
            legend_x: 16.0,
            legend_y: 16.0,
            legend_row_height: 22.0,
            legend_swatch_size: 14.0,
            transition_ms: 200,
        }
    }
}

impl LayoutConfig {
    pub fn outer_radius(&self) -> f32 {
        (self.width.min(self.height) * 0.5 - self.margin).max(1.0)
    }

    pub fn inner_radius(&self) -> f32 {
        (self.outer_radius() - self.arc_thickness).max(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub chunk_size: usize,
    pub mount_hook: String,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            mount_hook: DEFAULT_MOUNT_HOOK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub partition: PartitionConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::dashboard();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
            partition: PartitionConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    text_color: Option<String>,
    background: Option<String>,
    fallback_group_color: Option<String>,
    ribbon_fill: Option<String>,
    ribbon_stroke: Option<String>,
    ribbon_opacity: Option<NumberOrString>,
    ribbon_highlight_fill: Option<String>,
    ribbon_highlight_stroke: Option<String>,
    ribbon_highlight_opacity: Option<NumberOrString>,
    group_label_font_size: Option<NumberOrString>,
    group_label_color: Option<String>,
    legend_font_size: Option<NumberOrString>,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    margin: Option<f32>,
    arc_thickness: Option<f32>,
    viewbox_padding: Option<f32>,
    pad_angle: Option<f32>,
    node_label_offset: Option<f32>,
    group_arc_gap: Option<f32>,
    group_arc_thickness: Option<f32>,
    group_label_offset: Option<f32>,
    group_label_start_offset: Option<String>,
    legend_x: Option<f32>,
    legend_y: Option<f32>,
    legend_row_height: Option<f32>,
    legend_swatch_size: Option<f32>,
    transition_ms: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    chord: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
    chunk_size: Option<usize>,
    mount_hook: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let parsed = parse_config_file(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

/// Parses a config document leniently: strict JSON first, then JSON5 so that
/// hand-edited files with comments or trailing commas still load.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    apply_config_file(&mut config, parse_config_file(contents)?);
    Ok(config)
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(json_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|_| anyhow::anyhow!("invalid config: {json_err}")),
    }
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "default" || theme_name == "dashboard" {
            config.theme = Theme::dashboard();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.fallback_group_color {
            config.theme.fallback_group_color = v;
        }
        if let Some(v) = vars.ribbon_fill {
            config.theme.ribbon_fill = v;
        }
        if let Some(v) = vars.ribbon_stroke {
            config.theme.ribbon_stroke = v;
        }
        if let Some(v) = vars.ribbon_opacity.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.ribbon_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.ribbon_highlight_fill {
            config.theme.ribbon_highlight_fill = v;
        }
        if let Some(v) = vars.ribbon_highlight_stroke {
            config.theme.ribbon_highlight_stroke = v;
        }
        if let Some(v) = vars
            .ribbon_highlight_opacity
            .as_ref()
            .and_then(NumberOrString::as_f32)
        {
            config.theme.ribbon_highlight_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.group_label_font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.group_label_font_size = v;
        }
        if let Some(v) = vars.group_label_color {
            config.theme.group_label_color = v;
        }
        if let Some(v) = vars.legend_font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.legend_font_size = v;
        }
        if let Some(v) = vars.palette {
            if !v.is_empty() {
                config.theme.palette = v;
            }
        }
    }

    if let Some(chord) = parsed.chord {
        let layout = &mut config.layout;
        if let Some(v) = chord.width {
            layout.width = v;
        }
        if let Some(v) = chord.height {
            layout.height = v;
        }
        if let Some(v) = chord.margin {
            layout.margin = v;
        }
        if let Some(v) = chord.arc_thickness {
            layout.arc_thickness = v;
        }
        if let Some(v) = chord.viewbox_padding {
            layout.viewbox_padding = v;
        }
        if let Some(v) = chord.pad_angle {
            layout.pad_angle = v.max(0.0);
        }
        if let Some(v) = chord.node_label_offset {
            layout.node_label_offset = v;
        }
        if let Some(v) = chord.group_arc_gap {
            layout.group_arc_gap = v;
        }
        if let Some(v) = chord.group_arc_thickness {
            layout.group_arc_thickness = v;
        }
        if let Some(v) = chord.group_label_offset {
            layout.group_label_offset = v;
        }
        if let Some(v) = chord.group_label_start_offset {
            layout.group_label_start_offset = v;
        }
        if let Some(v) = chord.legend_x {
            layout.legend_x = v;
        }
        if let Some(v) = chord.legend_y {
            layout.legend_y = v;
        }
        if let Some(v) = chord.legend_row_height {
            layout.legend_row_height = v;
        }
        if let Some(v) = chord.legend_swatch_size {
            layout.legend_swatch_size = v;
        }
        if let Some(v) = chord.transition_ms {
            layout.transition_ms = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    if let Some(v) = parsed.chunk_size {
        config.partition.chunk_size = v;
    }
    if let Some(v) = parsed.mount_hook {
        config.partition.mount_hook = v;
    }

    config.render.background = config.theme.background.clone();
}
