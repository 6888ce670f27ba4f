use egui::Pos2;

use super::carrier::DataTransfer;

/// Every event name the tracker can synthesize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    DragStart,
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    DragEnd,
    Click,
    DoubleClick,
    ContextMenu,
}

impl EventKind {
    /// The conventional DOM event name, so existing listeners can be keyed by string.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::ContextMenu => "contextmenu",
        }
    }

    pub const fn is_drag(self) -> bool {
        matches!(
            self,
            Self::DragStart
                | Self::DragEnter
                | Self::DragOver
                | Self::DragLeave
                | Self::Drop
                | Self::DragEnd
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A synthetic event handed to [`super::DocumentHost::dispatch_event`].
///
/// Always bubbling and cancelable. The host walks `target` and its ancestors, and listeners call
/// [`Self::prevent_default`] to signal acceptance (for `dragover`/`drop`) or to suppress the
/// default action. Drag-family events borrow the session's [`DataTransfer`].
#[derive(Debug)]
pub struct SyntheticEvent<'a, E> {
    kind: EventKind,
    target: E,
    point: Option<Pos2>,
    data_transfer: Option<&'a mut DataTransfer>,
    default_prevented: bool,
}

impl<'a, E> SyntheticEvent<'a, E> {
    pub fn new(
        kind: EventKind,
        target: E,
        point: Option<Pos2>,
        data_transfer: Option<&'a mut DataTransfer>,
    ) -> Self {
        Self {
            kind,
            target,
            point,
            data_transfer,
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn target(&self) -> &E {
        &self.target
    }

    /// Screen position of the finger when the event was raised.
    pub fn point(&self) -> Option<Pos2> {
        self.point
    }

    pub fn bubbles(&self) -> bool {
        true
    }

    pub fn cancelable(&self) -> bool {
        true
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn data_transfer(&self) -> Option<&DataTransfer> {
        self.data_transfer.as_deref()
    }

    pub fn data_transfer_mut(&mut self) -> Option<&mut DataTransfer> {
        self.data_transfer.as_deref_mut()
    }
}
