use std::collections::VecDeque;

use crate::error::Result;
use crate::interaction::Interaction;
use crate::ir::ChordData;
use crate::layout::ChordLayout;
use crate::render::render_svg_with_state;
use crate::theme::Theme;

/// A drawn diagram retained by its mount point, so hover changes can be
/// re-applied without recomputing geometry.
#[derive(Debug, Clone)]
pub struct ChordScene {
    pub chunk_index: usize,
    pub layout: ChordLayout,
    pub theme: Theme,
    pub interaction: Interaction,
}

impl ChordScene {
    pub fn new(chunk_index: usize, layout: ChordLayout, theme: Theme) -> Self {
        Self {
            chunk_index,
            layout,
            theme,
            interaction: Interaction::default(),
        }
    }

    pub fn mouse_over(&mut self, node: usize) {
        self.interaction.mouse_over(node);
    }

    pub fn mouse_out(&mut self) {
        self.interaction.mouse_out();
    }

    pub fn to_svg(&self) -> String {
        render_svg_with_state(&self.layout, &self.theme, &self.interaction)
    }
}

#[derive(Debug, Clone)]
pub struct MountPoint {
    pub hook: String,
    attached: bool,
    scene: Option<ChordScene>,
}

impl MountPoint {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn scene(&self) -> Option<&ChordScene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut ChordScene> {
        self.scene.as_mut()
    }

    /// Drops whatever was drawn before and retains `scene`.
    pub fn replace(&mut self, scene: ChordScene) {
        self.scene = Some(scene);
    }

    pub fn clear(&mut self) {
        self.scene = None;
    }
}

/// The set of surfaces diagrams can be drawn into, addressed by hook name
/// and position among the mounts sharing that hook.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    mounts: Vec<MountPoint>,
    generation: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mounts(hook: &str, count: usize) -> Self {
        let mut stage = Self::new();
        for _ in 0..count {
            stage.add_mount(hook);
        }
        stage
    }

    pub fn add_mount(&mut self, hook: &str) -> usize {
        self.mounts.push(MountPoint {
            hook: hook.to_string(),
            attached: true,
            scene: None,
        });
        self.mounts.len() - 1
    }

    pub fn mounts(&self) -> &[MountPoint] {
        &self.mounts
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The `nth` attached mount carrying `hook`.
    pub fn resolve(&self, hook: &str, nth: usize) -> Option<&MountPoint> {
        self.mounts
            .iter()
            .filter(|mount| mount.attached && mount.hook == hook)
            .nth(nth)
    }

    pub fn resolve_mut(&mut self, hook: &str, nth: usize) -> Option<&mut MountPoint> {
        self.mounts
            .iter_mut()
            .filter(|mount| mount.attached && mount.hook == hook)
            .nth(nth)
    }

    /// Detaches every mount and invalidates work scheduled against the
    /// previous generation.
    pub fn teardown(&mut self) {
        for mount in &mut self.mounts {
            mount.attached = false;
            mount.clear();
        }
        self.generation += 1;
    }
}

#[derive(Debug, Clone)]
pub struct RenderTask {
    pub chunk_index: usize,
    pub chunk: ChordData,
    pub mount: usize,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    Skipped,
}

#[derive(Debug)]
pub struct TaskReport {
    pub chunk_index: usize,
    pub result: Result<DrawOutcome>,
}

/// Deferred draws, one independent task per chunk, drained by the caller's
/// event loop.
#[derive(Debug, Default)]
pub struct RenderQueue {
    tasks: VecDeque<RenderTask>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: RenderTask) {
        self.tasks.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs every pending task. Tasks scheduled before the last
    /// [`Stage::teardown`] are skipped without touching the stage; a failing
    /// task does not stop the rest.
    pub fn run_pending<F>(&mut self, stage: &mut Stage, mut draw: F) -> Vec<TaskReport>
    where
        F: FnMut(&RenderTask, &mut Stage) -> Result<()>,
    {
        let mut reports = Vec::with_capacity(self.tasks.len());
        while let Some(task) = self.tasks.pop_front() {
            if task.generation != stage.generation() {
                log::warn!(
                    "skipping stale draw of chunk {} (generation {} != {})",
                    task.chunk_index,
                    task.generation,
                    stage.generation()
                );
                reports.push(TaskReport {
                    chunk_index: task.chunk_index,
                    result: Ok(DrawOutcome::Skipped),
                });
                continue;
            }
            let result = draw(&task, &mut *stage).map(|()| DrawOutcome::Drawn);
            reports.push(TaskReport {
                chunk_index: task.chunk_index,
                result,
            });
        }
        reports
    }
}
