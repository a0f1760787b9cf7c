use crate::config::RenderConfig;
use crate::interaction::{Interaction, RibbonStyle};
use crate::layout::{ChordEnd, ChordLayout, GroupArcLayout, LegendItem, NodeArcLayout, RibbonLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::f32::consts::{PI, TAU};
use std::path::Path;

const EPSILON: f32 = 1e-6;

pub fn render_svg(layout: &ChordLayout, theme: &Theme) -> String {
    render_svg_with_state(layout, theme, &Interaction::default())
}

/// Paints the layout with ribbon styles taken from `interaction`. Hover
/// behaviour is also encoded declaratively (SMIL animations keyed on the node
/// label events), so the SVG stays interactive when displayed on its own.
pub fn render_svg_with_state(layout: &ChordLayout, theme: &Theme, interaction: &Interaction) -> String {
    let mut svg = String::new();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"100%\" height=\"100%\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<g class=\"legend\">");
    for item in &layout.legend {
        svg.push_str(&legend_row_svg(item, theme));
    }
    svg.push_str("</g>");

    svg.push_str(&format!(
        "<g transform=\"translate({:.2},{:.2})\">",
        layout.center.0, layout.center.1
    ));

    svg.push_str("<g class=\"groups\">");
    for group in &layout.groups {
        svg.push_str(&group_arc_svg(layout, group, theme));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &layout.nodes {
        svg.push_str(&node_svg(layout, node, theme));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"ribbons\" cursor=\"pointer\">");
    for ribbon in &layout.ribbons {
        let style = interaction.ribbon_style(ribbon, theme);
        svg.push_str(&ribbon_svg(layout, ribbon, &style, theme));
    }
    svg.push_str("</g>");

    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

fn legend_row_svg(item: &LegendItem, theme: &Theme) -> String {
    let text_x = item.x + item.swatch_size + 6.0;
    let text_y = item.y + item.swatch_size / 2.0;
    format!(
        "<g class=\"legend-row\"><rect class=\"legend-color\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/><text class=\"legend-text\" x=\"{text_x:.2}\" y=\"{text_y:.2}\" dy=\".35em\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text></g>",
        item.x,
        item.y,
        item.swatch_size,
        item.swatch_size,
        escape_xml(&item.color),
        escape_xml(&theme.font_family),
        theme.legend_font_size,
        escape_xml(&theme.text_color),
        escape_xml(&item.group)
    )
}

fn group_arc_svg(layout: &ChordLayout, group: &GroupArcLayout, theme: &Theme) -> String {
    let path_id = layout.group_label_path_id(group.index);
    let label_path = open_arc_path(group.label.radius, group.start_angle, group.end_angle);
    format!(
        "<g class=\"group\"><path class=\"group-arc\" d=\"{}\" fill=\"{}\" stroke=\"{}\"/><path id=\"{path_id}\" d=\"{label_path}\" fill=\"none\" stroke=\"none\"/><text class=\"group-label\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"><textPath href=\"#{path_id}\" xlink:href=\"#{path_id}\" startOffset=\"{}\">{}</textPath></text></g>",
        arc_path(
            group.inner_radius,
            group.outer_radius,
            group.start_angle,
            group.end_angle
        ),
        escape_xml(&group.fill),
        escape_xml(&group.fill),
        escape_xml(&theme.font_family),
        group.label.font_size,
        escape_xml(&theme.group_label_color),
        escape_xml(&group.label.start_offset),
        escape_xml(&group.label.text)
    )
}

fn node_svg(layout: &ChordLayout, node: &NodeArcLayout, theme: &Theme) -> String {
    format!(
        "<g class=\"node\"><path class=\"node-arc\" d=\"{}\" fill=\"{}\" stroke=\"{}\"/><text id=\"{}\" class=\"node-label\" dy=\".35em\" transform=\"{}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text></g>",
        arc_path(
            node.inner_radius,
            node.outer_radius,
            node.start_angle,
            node.end_angle
        ),
        escape_xml(&node.fill),
        escape_xml(&node.stroke),
        layout.node_label_id(node.index),
        node.label.transform(),
        node.label.anchor.as_svg(),
        escape_xml(&theme.font_family),
        node.label.font_size,
        escape_xml(&theme.text_color),
        escape_xml(&node.label.text)
    )
}

fn ribbon_svg(layout: &ChordLayout, ribbon: &RibbonLayout, style: &RibbonStyle, theme: &Theme) -> String {
    let mut out = format!(
        "<path class=\"ribbon\" data-source=\"{}\" data-target=\"{}\" d=\"{}\" fill=\"{}\" stroke=\"{}\" fill-opacity=\"{}\" stroke-opacity=\"{}\">",
        ribbon.chord.source.index,
        ribbon.chord.target.index,
        ribbon_path(ribbon.radius, &ribbon.chord.source, &ribbon.chord.target),
        escape_xml(&style.fill),
        escape_xml(&style.stroke),
        style.opacity,
        style.opacity
    );

    let mut endpoints = vec![ribbon.chord.source.index];
    if ribbon.chord.target.index != ribbon.chord.source.index {
        endpoints.push(ribbon.chord.target.index);
    }
    let lit = RibbonStyle::highlighted(theme);
    let resting = RibbonStyle::resting(theme);
    for node in endpoints {
        let label_id = layout.node_label_id(node);
        out.push_str(&hover_animations(
            &label_id,
            "mouseover",
            &lit,
            layout.transition_ms,
        ));
        out.push_str(&hover_animations(
            &label_id,
            "mouseout",
            &resting,
            layout.transition_ms,
        ));
    }

    out.push_str("</path>");
    out
}

fn hover_animations(label_id: &str, event: &str, style: &RibbonStyle, duration_ms: u32) -> String {
    let opacity = style.opacity.to_string();
    [
        ("fill", style.fill.as_str()),
        ("stroke", style.stroke.as_str()),
        ("fill-opacity", opacity.as_str()),
        ("stroke-opacity", opacity.as_str()),
    ]
    .iter()
    .map(|(attribute, value)| {
        format!(
            "<animate attributeName=\"{attribute}\" to=\"{}\" dur=\"{duration_ms}ms\" begin=\"{label_id}.{event}\" fill=\"freeze\"/>",
            escape_xml(value)
        )
    })
    .collect()
}

fn point(radius: f32, angle: f32) -> (f32, f32) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Annular sector between `inner` and `outer`, clockwise from `start` to
/// `end`. A full turn is drawn as two half arcs.
pub fn arc_path(inner: f32, outer: f32, start: f32, end: f32) -> String {
    let span = (end - start).abs();
    let (o0x, o0y) = point(outer, start);
    if span < EPSILON {
        let (i0x, i0y) = point(inner, start);
        return format!("M {o0x:.2} {o0y:.2} L {i0x:.2} {i0y:.2} Z");
    }

    if span >= TAU - EPSILON {
        let (ohx, ohy) = point(outer, start + PI);
        let mut d = format!(
            "M {o0x:.2} {o0y:.2} A {outer:.2} {outer:.2} 0 1 1 {ohx:.2} {ohy:.2} A {outer:.2} {outer:.2} 0 1 1 {o0x:.2} {o0y:.2}"
        );
        if inner > EPSILON {
            let (i0x, i0y) = point(inner, start);
            let (ihx, ihy) = point(inner, start + PI);
            d.push_str(&format!(
                " M {i0x:.2} {i0y:.2} A {inner:.2} {inner:.2} 0 1 0 {ihx:.2} {ihy:.2} A {inner:.2} {inner:.2} 0 1 0 {i0x:.2} {i0y:.2}"
            ));
        }
        d.push_str(" Z");
        return d;
    }

    let large = if span > PI { 1 } else { 0 };
    let (o1x, o1y) = point(outer, end);
    let mut d = format!(
        "M {o0x:.2} {o0y:.2} A {outer:.2} {outer:.2} 0 {large} 1 {o1x:.2} {o1y:.2}"
    );
    if inner > EPSILON {
        let (i1x, i1y) = point(inner, end);
        let (i0x, i0y) = point(inner, start);
        d.push_str(&format!(
            " L {i1x:.2} {i1y:.2} A {inner:.2} {inner:.2} 0 {large} 0 {i0x:.2} {i0y:.2}"
        ));
    } else {
        d.push_str(" L 0 0");
    }
    d.push_str(" Z");
    d
}

/// Open clockwise arc used as a text path.
pub fn open_arc_path(radius: f32, start: f32, end: f32) -> String {
    let (x0, y0) = point(radius, start);
    let span = (end - start).clamp(0.0, TAU - 1e-3);
    let (x1, y1) = point(radius, start + span);
    let large = if span > PI { 1 } else { 0 };
    format!("M {x0:.2} {y0:.2} A {radius:.2} {radius:.2} 0 {large} 1 {x1:.2} {y1:.2}")
}

/// Two arcs on the circle of `radius` joined through the centre by
/// quadratic curves.
pub fn ribbon_path(radius: f32, source: &ChordEnd, target: &ChordEnd) -> String {
    let (s0x, s0y) = point(radius, source.start_angle);
    let (s1x, s1y) = point(radius, source.end_angle);
    let s_large = if source.end_angle - source.start_angle > PI { 1 } else { 0 };
    let mut d = format!(
        "M {s0x:.2} {s0y:.2} A {radius:.2} {radius:.2} 0 {s_large} 1 {s1x:.2} {s1y:.2}"
    );
    if source.start_angle != target.start_angle || source.end_angle != target.end_angle {
        let (t0x, t0y) = point(radius, target.start_angle);
        let (t1x, t1y) = point(radius, target.end_angle);
        let t_large = if target.end_angle - target.start_angle > PI { 1 } else { 0 };
        d.push_str(&format!(
            " Q 0 0 {t0x:.2} {t0y:.2} A {radius:.2} {radius:.2} 0 {t_large} 1 {t1x:.2} {t1y:.2}"
        ));
    }
    d.push_str(&format!(" Q 0 0 {s0x:.2} {s0y:.2} Z"));
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    // The dashboard scales the SVG to its container; raster output needs a
    // concrete size instead of 100%.
    let sized = svg.replacen(
        "width=\"100%\" height=\"100%\" viewBox",
        &format!(
            "width=\"{}\" height=\"{}\" viewBox",
            render_cfg.width, render_cfg.height
        ),
        1,
    );
    let tree = usvg::Tree::from_str(&sized, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some((r, g, b)) = crate::theme::parse_color(&render_cfg.background) {
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255));
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScale;
    use crate::config::LayoutConfig;
    use crate::ir::ChordData;
    use crate::layout::compute_chord_layout;

    fn sample_layout() -> ChordLayout {
        let mut chunk = ChordData::new();
        chunk.push_node("Age & sex", "PPMI");
        chunk.push_node("age", "BIOFIND");
        chunk.push_link("Age & sex", "age");
        let scale = ColorScale::category10().with_groups_of(&chunk);
        compute_chord_layout(&chunk, &scale, &Theme::dashboard(), &LayoutConfig::default())
    }

    #[test]
    fn render_svg_basic() {
        let svg = render_svg(&sample_layout(), &Theme::dashboard());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("viewBox=\"0 0 800 800\""));
        assert!(svg.contains("Age &amp; sex"));
        assert_eq!(svg.matches("class=\"ribbon\"").count(), 1);
        assert_eq!(svg.matches("class=\"group-arc\"").count(), 2);
        assert_eq!(svg.matches("class=\"legend-row\"").count(), 2);
        assert!(svg.contains("startOffset=\"25%\""));
        assert!(svg.contains("begin=\"chord_node_0.mouseover\""));
        assert!(svg.contains("begin=\"chord_node_1.mouseout\""));
        assert!(svg.contains("fill=\"skyblue\""));
    }

    #[test]
    fn hovered_state_is_painted() {
        let layout = sample_layout();
        let theme = Theme::dashboard();
        let mut interaction = Interaction::new();
        interaction.mouse_over(0);
        let svg = render_svg_with_state(&layout, &theme, &interaction);
        assert!(svg.contains("class=\"ribbon\" data-source"));
        assert!(svg.contains("d=\"M") && svg.contains("fill=\"black\" stroke=\"black\" fill-opacity=\"0.95\""));
    }

    #[test]
    fn arc_path_shapes() {
        let quarter = arc_path(10.0, 20.0, 0.0, PI / 2.0);
        assert!(quarter.starts_with("M 0.00 -20.00 A 20.00 20.00 0 0 1 20.00"));
        assert!(quarter.contains("L 10.00"));
        assert!(quarter.ends_with('Z'));

        let big = arc_path(10.0, 20.0, 0.0, 1.5 * PI);
        assert!(big.contains(" 0 1 1 "));

        let full = arc_path(10.0, 20.0, 0.0, TAU);
        assert_eq!(full.matches(" A ").count(), 4);

        let empty = arc_path(10.0, 20.0, 1.0, 1.0);
        assert!(!empty.contains(" A "));
    }

    #[test]
    fn ribbon_path_joins_both_ends_through_centre() {
        let source = ChordEnd {
            index: 0,
            start_angle: 0.0,
            end_angle: 0.5,
            value: 1.0,
        };
        let target = ChordEnd {
            index: 1,
            start_angle: PI,
            end_angle: PI + 0.5,
            value: 1.0,
        };
        let d = ribbon_path(100.0, &source, &target);
        assert_eq!(d.matches(" Q 0 0 ").count(), 2);
        assert_eq!(d.matches(" A ").count(), 2);
        assert!(d.starts_with("M 0.00 -100.00"));

        let self_chord = ribbon_path(100.0, &source, &source);
        assert_eq!(self_chord.matches(" Q 0 0 ").count(), 1);
    }

    #[test]
    fn hover_begin_ids_carry_no_offset_separators() {
        let mut layout = sample_layout();
        layout.id_prefix = "chord3".to_string();
        let svg = render_svg(&layout, &Theme::dashboard());
        let begins: Vec<&str> = svg
            .split("begin=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect();
        assert!(!begins.is_empty());
        for begin in begins {
            let (id, event) = begin.rsplit_once('.').unwrap();
            assert!(matches!(event, "mouseover" | "mouseout"), "{begin}");
            assert!(!id.contains(['-', '+', '.']), "{begin}");
            assert!(svg.contains(&format!("<text id=\"{id}\"")), "{begin}");
        }
    }

    #[test]
    fn theme_text_colors_are_escaped() {
        let mut theme = Theme::dashboard();
        theme.text_color = "#333\" onload=\"x".to_string();
        theme.group_label_color = "<red>".to_string();
        let svg = render_svg(&sample_layout(), &theme);
        assert!(!svg.contains("onload=\"x\""));
        assert!(svg.contains("fill=\"#333&quot; onload=&quot;x\""));
        assert!(svg.contains("fill=\"&lt;red&gt;\""));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("<a href='x'>&</a>"), "&lt;a href=&apos;x&apos;&gt;&amp;&lt;/a&gt;");
    }
}
