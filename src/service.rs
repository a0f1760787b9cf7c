use crate::color::ColorLookup;
use crate::config::{Config, LayoutConfig, PartitionConfig};
use crate::error::{ChordError, Result};
use crate::ir::ChordData;
use crate::layout::{ChordLayout, compute_chord_layout};
use crate::partition;
use crate::stage::{ChordScene, RenderQueue, RenderTask, Stage, TaskReport};
use crate::theme::Theme;

/// Entry point used by the dashboard: partitions mapping graphs and draws the
/// resulting chunks into a [`Stage`].
#[derive(Debug, Clone)]
pub struct ChordDiagramService {
    data_chunks: Vec<ChordData>,
    theme: Theme,
    layout: LayoutConfig,
    partition: PartitionConfig,
}

impl Default for ChordDiagramService {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ChordDiagramService {
    pub fn new(config: &Config) -> Self {
        Self {
            data_chunks: Vec::new(),
            theme: config.theme.clone(),
            layout: config.layout.clone(),
            partition: config.partition.clone(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn mount_hook(&self) -> &str {
        &self.partition.mount_hook
    }

    pub fn default_chunk_size(&self) -> usize {
        self.partition.chunk_size
    }

    /// Splits `data` into chunks and keeps the result for [`Self::data_chunks`].
    pub fn chunk_data(&mut self, data: &ChordData, chunk_size: usize) -> Vec<ChordData> {
        let chunks = partition::chunk_data(data, chunk_size);
        self.data_chunks = chunks.clone();
        chunks
    }

    /// Chunks produced by the most recent [`Self::chunk_data`] call.
    pub fn data_chunks(&self) -> &[ChordData] {
        &self.data_chunks
    }

    pub fn layout_chunk(&self, chunk: &ChordData, index: usize, colors: &dyn ColorLookup) -> ChordLayout {
        let mut layout = compute_chord_layout(chunk, colors, &self.theme, &self.layout);
        layout.id_prefix = format!("chord{index}");
        layout
    }

    /// Draws `chunks[index]` into the first mount carrying the service hook,
    /// replacing whatever that mount held.
    pub fn create_chord_diagrams(
        &self,
        chunks: &[ChordData],
        index: usize,
        stage: &mut Stage,
        colors: &dyn ColorLookup,
    ) -> Result<()> {
        let chunk = chunks.get(index).ok_or(ChordError::ChunkOutOfRange {
            index,
            len: chunks.len(),
        })?;
        self.draw_into(chunk, index, 0, stage, colors)
    }

    /// Queues one independent draw per chunk; chunk `i` targets the `i`-th
    /// mount carrying the service hook.
    pub fn schedule_chord_diagrams(&self, chunks: &[ChordData], stage: &Stage, queue: &mut RenderQueue) {
        for (chunk_index, chunk) in chunks.iter().enumerate() {
            queue.schedule(RenderTask {
                chunk_index,
                chunk: chunk.clone(),
                mount: chunk_index,
                generation: stage.generation(),
            });
        }
        log::debug!(
            "scheduled {} chord draws at generation {}",
            chunks.len(),
            stage.generation()
        );
    }

    pub fn run_scheduled(
        &self,
        queue: &mut RenderQueue,
        stage: &mut Stage,
        colors: &dyn ColorLookup,
    ) -> Vec<TaskReport> {
        queue.run_pending(stage, |task, stage| {
            self.draw_into(&task.chunk, task.chunk_index, task.mount, stage, colors)
        })
    }

    fn draw_into(
        &self,
        chunk: &ChordData,
        chunk_index: usize,
        nth: usize,
        stage: &mut Stage,
        colors: &dyn ColorLookup,
    ) -> Result<()> {
        let hook = self.partition.mount_hook.as_str();
        if stage.resolve(hook, nth).is_none() {
            return Err(ChordError::MountNotFound {
                hook: hook.to_string(),
                index: nth,
            });
        }
        let layout = self.layout_chunk(chunk, chunk_index, colors);
        let scene = ChordScene::new(chunk_index, layout, self.theme.clone());
        if let Some(mount) = stage.resolve_mut(hook, nth) {
            mount.replace(scene);
        }
        Ok(())
    }
}

/// Position within a chunk list, stepped by the previous/next controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkCursor {
    index: usize,
    len: usize,
}

impl ChunkCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Advances unless already on the last chunk. Returns the current index.
    pub fn next(&mut self) -> usize {
        if self.has_next() {
            self.index += 1;
        }
        self.index
    }

    pub fn previous(&mut self) -> usize {
        if self.has_previous() {
            self.index -= 1;
        }
        self.index
    }

    /// Back to the first chunk of a freshly loaded list.
    pub fn reset(&mut self, len: usize) {
        self.index = 0;
        self.len = len;
    }
}
