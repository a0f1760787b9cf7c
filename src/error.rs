use thiserror::Error;

/// Failures surfaced by the chord core. Data irregularities inside a chord
/// document (dangling link names, duplicate node keys) are not errors and never
/// show up here.
#[derive(Debug, Error)]
pub enum ChordError {
    #[error("no mount point matching `{hook}` at position {index}")]
    MountNotFound { hook: String, index: usize },

    #[error("chunk index {index} out of range ({len} chunks)")]
    ChunkOutOfRange { index: usize, len: usize },

    #[error("failed to load {context}: {message}")]
    Upstream { context: String, message: String },
}

impl ChordError {
    pub fn upstream(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ChordError::Upstream {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn is_render_target_missing(&self) -> bool {
        matches!(self, ChordError::MountNotFound { .. })
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, ChordError::Upstream { .. })
    }
}

pub type Result<T, E = ChordError> = std::result::Result<T, E>;
