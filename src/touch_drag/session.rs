use std::time::Duration;

use egui::{Pos2, Vec2};

/// Where the single tracked touch currently is in its lifecycle.
#[derive(Debug)]
pub(super) enum Phase<E> {
    Idle,

    /// Finger down, no drag running yet.
    Pressed(Press<E>),

    /// Finger moved past the threshold over a draggable element.
    Dragging(Drag<E>),
}

#[derive(Debug)]
pub(super) struct Press<E> {
    pub(super) target: E,
    pub(super) start: Pos2,
    pub(super) last_point: Pos2,
    pub(super) began: Duration,

    /// Draggable ancestor of `target`. `Some` means the press is armed.
    pub(super) candidate: Option<E>,

    pub(super) context_menu_at: Option<Duration>,

    /// Press-hold mode only: dragging is not allowed before this time.
    pub(super) drag_enabled_at: Option<Duration>,

    pub(super) suppress_click: bool,
}

impl<E> Press<E> {
    /// Manhattan distance travelled since the touch started.
    pub(super) fn displacement(&self, point: Pos2) -> f32 {
        let delta = point - self.start;
        delta.x.abs() + delta.y.abs()
    }

    pub(super) fn next_deadline(&self) -> Option<Duration> {
        match (self.context_menu_at, self.drag_enabled_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[derive(Debug)]
pub(super) struct Drag<E> {
    pub(super) source: E,
    pub(super) surrogate: Surrogate<E>,
    pub(super) last_point: Pos2,

    /// Last element that got `dragenter`; also the element `drop` goes to.
    pub(super) drop_target: Option<E>,
}

/// The element following the finger, plus what is needed to undo the drag's visual changes.
#[derive(Debug)]
pub(super) struct Surrogate<E> {
    pub(super) element: E,

    /// Finger position relative to the source's top-left corner at drag start.
    pub(super) grab_offset: Vec2,

    /// Source opacity before it was dimmed.
    pub(super) source_opacity: f32,

    /// Position waiting for the next display frame.
    pub(super) pending_position: Option<Pos2>,
}

impl<E> Surrogate<E> {
    pub(super) fn top_left_for(&self, point: Pos2) -> Pos2 {
        point - self.grab_offset
    }
}

impl<E> Phase<E> {
    pub(super) fn next_deadline(&self) -> Option<Duration> {
        match self {
            Self::Pressed(press) => press.next_deadline(),
            Self::Idle | Self::Dragging(_) => None,
        }
    }
}
