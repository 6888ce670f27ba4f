use std::time::Duration;

use egui::{Pos2, Rect};

use super::event::SyntheticEvent;

/// The document the tracker runs against.
///
/// The tracker never owns the element tree. It asks the host for hit-tests, ancestry and
/// geometry, and hands synthetic events back to it for dispatch. Every method must tolerate
/// elements that were removed by other code in the meantime: lookups return `None`, mutations
/// become no-ops.
pub trait DocumentHost {
    /// A cheap handle to an element (an id, an index, a reference-counted node).
    type Element: Clone + PartialEq + std::fmt::Debug;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Topmost rendered element at `point`.
    ///
    /// The drag surrogate must be transparent to this hit-test, otherwise the finger would only
    /// ever be "over" the surrogate.
    fn element_at(&self, point: Pos2) -> Option<Self::Element>;

    fn bounding_rect(&self, element: &Self::Element) -> Option<Rect>;

    /// Whether the element carries the `draggable` flag.
    fn is_draggable(&self, element: &Self::Element) -> bool;

    /// Element kind (tag name) used to exclude form controls from dragging.
    fn element_kind(&self, element: &Self::Element) -> &str;

    /// Clone `source` into a new element inserted on top of the document, excluded from
    /// hit-testing. Returns `None` if `source` no longer exists.
    fn create_surrogate(&mut self, source: &Self::Element) -> Option<Self::Element>;

    fn remove_element(&mut self, element: &Self::Element);

    fn opacity(&self, element: &Self::Element) -> f32;

    fn set_opacity(&mut self, element: &Self::Element, opacity: f32);

    /// Move a (surrogate) element so its top-left corner lands on `top_left`, in screen space.
    fn set_element_position(&mut self, element: &Self::Element, top_left: Pos2);

    /// Dispatch `event` synchronously at its target, bubbling through the ancestors.
    fn dispatch_event(&mut self, event: &mut SyntheticEvent<'_, Self::Element>);
}

/// A raw touch notification from the host.
#[derive(Clone, Copy, Debug)]
pub struct TouchInput<'a, E> {
    /// The element the platform reported as the touch target.
    pub target: &'a E,

    /// All touch points currently on the surface, in screen coordinates.
    ///
    /// Empty for a touch-end or touch-cancel of the last finger.
    pub touches: &'a [Pos2],

    /// Monotonic event time.
    pub time: Duration,

    /// Whether some other host handler already consumed this touch.
    pub default_prevented: bool,
}

impl<'a, E> TouchInput<'a, E> {
    pub fn new(target: &'a E, touches: &'a [Pos2], time: Duration) -> Self {
        Self {
            target,
            touches,
            time,
            default_prevented: false,
        }
    }

    /// The single active touch point, or `None` for zero or several fingers.
    pub fn single_point(&self) -> Option<Pos2> {
        match self.touches {
            [point] => Some(*point),
            _ => None,
        }
    }
}

/// Whether the host should suppress the platform's default handling of a touch notification
/// (scrolling, zooming, native click emulation).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl Handled {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}
