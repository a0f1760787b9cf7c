use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Multiplier applied per step by [`darker`], matching the usual sRGB
/// "darker" convention of chart libraries.
pub const DARKER_FACTOR: f64 = 0.7;

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex regex"));
static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+\s*)?\)$")
        .expect("valid rgb regex")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub text_color: String,
    pub background: String,
    pub fallback_group_color: String,
    pub ribbon_fill: String,
    pub ribbon_stroke: String,
    pub ribbon_opacity: f32,
    pub ribbon_highlight_fill: String,
    pub ribbon_highlight_stroke: String,
    pub ribbon_highlight_opacity: f32,
    pub group_label_font_size: f32,
    pub group_label_color: String,
    pub legend_font_size: f32,
    pub palette: Vec<String>,
}

impl Theme {
    /// Look of the original dashboard: sky-blue ribbons, black highlight.
    pub fn dashboard() -> Self {
        Self {
            font_family: "Roboto, \"Helvetica Neue\", sans-serif".to_string(),
            text_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
            fallback_group_color: "#CCCCCC".to_string(),
            ribbon_fill: "skyblue".to_string(),
            ribbon_stroke: "skyblue".to_string(),
            ribbon_opacity: 0.75,
            ribbon_highlight_fill: "black".to_string(),
            ribbon_highlight_stroke: "black".to_string(),
            ribbon_highlight_opacity: 0.95,
            group_label_font_size: 16.0,
            group_label_color: "#333333".to_string(),
            legend_font_size: 14.0,
            palette: CATEGORY10.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            fallback_group_color: "#C7D2E5".to_string(),
            ribbon_fill: "#9DB4D3".to_string(),
            ribbon_stroke: "#7A8AA6".to_string(),
            ribbon_opacity: 0.6,
            ribbon_highlight_fill: "#1C2430".to_string(),
            ribbon_highlight_stroke: "#1C2430".to_string(),
            ribbon_highlight_opacity: 0.9,
            group_label_font_size: 14.0,
            group_label_color: "#1C2430".to_string(),
            legend_font_size: 13.0,
            palette: CATEGORY10.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dashboard()
    }
}

/// Parses `#rgb`, `#rrggbb`, `rgb(..)`/`rgba(..)` and a handful of CSS names.
pub fn parse_color(input: &str) -> Option<(u8, u8, u8)> {
    let value = input.trim();
    if let Some(caps) = HEX_RE.captures(value) {
        let hex = &caps[1];
        if hex.len() == 3 {
            let mut out = [0u8; 3];
            for (slot, ch) in out.iter_mut().zip(hex.chars()) {
                let digit = ch.to_digit(16)? as u8;
                *slot = digit * 17;
            }
            return Some((out[0], out[1], out[2]));
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some((r, g, b));
    }
    if let Some(caps) = RGB_RE.captures(value) {
        let channel = |idx: usize| caps[idx].parse::<u16>().ok().map(|v| v.min(255) as u8);
        return Some((channel(1)?, channel(2)?, channel(3)?));
    }
    named_color(&value.to_ascii_lowercase())
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "gray" | "grey" => (128, 128, 128),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "skyblue" => (135, 206, 235),
        "steelblue" => (70, 130, 180),
        "teal" => (0, 128, 128),
        _ => return None,
    };
    Some(rgb)
}

/// Darkens `color` by `k` steps of [`DARKER_FACTOR`]. Unparseable input is
/// returned unchanged.
pub fn darker(color: &str, k: f32) -> String {
    let Some((r, g, b)) = parse_color(color) else {
        return color.to_string();
    };
    let factor = DARKER_FACTOR.powf(k as f64);
    let scale = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
    format!("rgb({}, {}, {})", scale(r), scale(g), scale(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_color_forms() {
        assert_eq!(parse_color("#1f77b4"), Some((31, 119, 180)));
        assert_eq!(parse_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some((10, 20, 30)));
        assert_eq!(parse_color("rgba(10,20,30,0.5)"), Some((10, 20, 30)));
        assert_eq!(parse_color("SkyBlue"), Some((135, 206, 235)));
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn darker_scales_channels() {
        assert_eq!(darker("#ffffff", 1.0), "rgb(178, 178, 178)");
        assert_eq!(darker("#000000", 1.0), "rgb(0, 0, 0)");
        assert_eq!(darker("bogus", 1.0), "bogus");
    }
}
