use serde::Serialize;

use crate::layout::{ChordLayout, RibbonLayout};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RibbonStyle {
    pub fill: String,
    pub stroke: String,
    pub opacity: f32,
}

impl RibbonStyle {
    pub fn resting(theme: &Theme) -> Self {
        Self {
            fill: theme.ribbon_fill.clone(),
            stroke: theme.ribbon_stroke.clone(),
            opacity: theme.ribbon_opacity,
        }
    }

    pub fn highlighted(theme: &Theme) -> Self {
        Self {
            fill: theme.ribbon_highlight_fill.clone(),
            stroke: theme.ribbon_highlight_stroke.clone(),
            opacity: theme.ribbon_highlight_opacity,
        }
    }
}

/// Hover state of one drawn diagram. Hovering a node label highlights every
/// ribbon attached to that node; leaving it restores all ribbons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    hovered: Option<usize>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mouse_over(&mut self, node: usize) {
        self.hovered = Some(node);
    }

    pub fn mouse_out(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_highlighted(&self, ribbon: &RibbonLayout) -> bool {
        self.hovered.is_some_and(|node| ribbon.touches(node))
    }

    pub fn ribbon_style(&self, ribbon: &RibbonLayout, theme: &Theme) -> RibbonStyle {
        if self.is_highlighted(ribbon) {
            RibbonStyle::highlighted(theme)
        } else {
            RibbonStyle::resting(theme)
        }
    }

    /// Indices of ribbons currently highlighted.
    pub fn highlighted_ribbons(&self, layout: &ChordLayout) -> Vec<usize> {
        layout
            .ribbons
            .iter()
            .filter(|ribbon| self.is_highlighted(ribbon))
            .map(|ribbon| ribbon.index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScale;
    use crate::config::LayoutConfig;
    use crate::ir::ChordData;
    use crate::layout::compute_chord_layout;

    fn star_layout() -> ChordLayout {
        let mut chunk = ChordData::new();
        chunk.push_node("hub", "A");
        chunk.push_node("x", "B");
        chunk.push_node("y", "C");
        chunk.push_node("z", "D");
        chunk.push_link("hub", "x");
        chunk.push_link("hub", "y");
        chunk.push_link("z", "y");
        compute_chord_layout(
            &chunk,
            &ColorScale::default(),
            &Theme::dashboard(),
            &LayoutConfig::default(),
        )
    }

    #[test]
    fn hover_highlights_only_touching_ribbons() {
        let layout = star_layout();
        let theme = Theme::dashboard();
        let mut interaction = Interaction::new();
        assert!(interaction.highlighted_ribbons(&layout).is_empty());

        // node 0 is "hub" in group A
        interaction.mouse_over(0);
        let lit = interaction.highlighted_ribbons(&layout);
        assert_eq!(lit.len(), 2);
        for ribbon in &layout.ribbons {
            let style = interaction.ribbon_style(ribbon, &theme);
            if ribbon.touches(0) {
                assert_eq!(style, RibbonStyle::highlighted(&theme));
            } else {
                assert_eq!(style, RibbonStyle::resting(&theme));
            }
        }

        interaction.mouse_out();
        assert_eq!(interaction.hovered(), None);
        assert!(interaction.highlighted_ribbons(&layout).is_empty());
    }

    #[test]
    fn highlight_is_darker_and_more_opaque() {
        let theme = Theme::dashboard();
        let resting = RibbonStyle::resting(&theme);
        let lit = RibbonStyle::highlighted(&theme);
        assert!(lit.opacity > resting.opacity);
        assert_ne!(lit.fill, resting.fill);
    }
}
