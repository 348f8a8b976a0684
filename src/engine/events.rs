use crate::core::ids::{CategoryId, SeriesId, TaskRef};

/// Interaction reported by the rendering collaborator.
///
/// Pixel values are in the same space as [`crate::engine::layout::PixelBox`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartEvent {
    /// The bar was dropped at a new left edge inside its own row.
    DragStopped { task: TaskRef, pixel_offset: i64 },
    ResizeStopped {
        task: TaskRef,
        pixel_offset: i64,
        pixel_width: i64,
    },
    DroppedOnRow {
        task: TaskRef,
        target_category: CategoryId,
        target_series: SeriesId,
    },
    BlockClicked { task: TaskRef },
}

impl ChartEvent {
    pub fn task(&self) -> &TaskRef {
        match self {
            ChartEvent::DragStopped { task, .. }
            | ChartEvent::ResizeStopped { task, .. }
            | ChartEvent::DroppedOnRow { task, .. }
            | ChartEvent::BlockClicked { task } => task,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Click,
    Drag,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownTask,
    /// The task exists but has no bar (unscheduled or hidden in
    /// single-task mode).
    NotLaidOut,
    Disabled(Capability),
    SameRow,
    UnknownTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl EventOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EventOutcome::Applied)
    }
}
