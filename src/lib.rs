#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod partition;
pub mod render;
pub mod service;
pub mod source;
pub mod stage;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use color::{ColorLookup, ColorScale};
pub use error::{ChordError, Result};
pub use ir::{ChordData, ChordLink, ChordNode, CohortInfo, CohortMetadata};
pub use partition::chunk_data;
pub use service::{ChordDiagramService, ChunkCursor};
pub use stage::{RenderQueue, Stage};

/// Lays out and renders one chunk with the default configuration.
pub fn render_chunk_svg(chunk: &ChordData, colors: &dyn ColorLookup) -> String {
    let config = config::Config::default();
    let layout = layout::compute_chord_layout(chunk, colors, &config.theme, &config.layout);
    render::render_svg(&layout, &config.theme)
}
