use std::time::Duration;

/// Options for [`super::TouchDragTracker`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TouchDragOptions {
    /// A touch that starts within this long after the previous touch ended is a double-tap
    /// and raises `dblclick` instead of starting a new gesture.
    pub double_click_delay: Duration,

    /// How long a finger must rest before `contextmenu` is raised (and the trailing `click` is
    /// suppressed).
    pub context_menu_delay: Duration,

    /// Manhattan distance (in points) the finger must travel from the touch start before an
    /// armed drag actually starts.
    ///
    /// Also the distance after which a non-draggable touch counts as a scroll rather than a tap.
    pub drag_threshold: f32,

    /// Opacity of the surrogate element that follows the finger.
    pub surrogate_opacity: f32,

    /// Opacity applied to the drag source while the drag is active. Restored on reset.
    pub source_opacity: f32,

    /// Element kinds (tag names) that are never tracked, typically native form controls.
    pub excluded_kinds: Vec<String>,

    /// If set, a draggable element must be held still for a while before it can be dragged.
    ///
    /// Useful on scrollable lists of draggable items: a quick swipe scrolls, a press-and-hold
    /// picks the item up.
    pub press_hold: Option<PressHoldOptions>,

    /// If true, record gesture decisions in a small ring buffer (see
    /// [`super::TouchDragTracker::debug_log_text`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,
}

impl Default for TouchDragOptions {
    fn default() -> Self {
        Self {
            double_click_delay: Duration::from_millis(500),
            context_menu_delay: Duration::from_millis(900),
            drag_threshold: 5.0,
            surrogate_opacity: 0.5,
            source_opacity: 0.5,
            excluded_kinds: ["input", "textarea", "select", "option"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            press_hold: None,
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

/// Press-and-hold requirement for starting a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PressHoldOptions {
    /// How long the finger must rest on the draggable element.
    pub delay: Duration,

    /// Manhattan distance the finger may wander during the hold before the touch is treated as
    /// a scroll and the drag is disarmed.
    pub margin: f32,
}

impl Default for PressHoldOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(400),
            margin: 25.0,
        }
    }
}

impl TouchDragOptions {
    pub(crate) fn is_excluded_kind(&self, kind: &str) -> bool {
        self.excluded_kinds
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(kind))
    }
}
