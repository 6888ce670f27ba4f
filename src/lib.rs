//! Touch-to-mouse drag-and-drop emulation.
//!
//! [`TouchDragTracker`] watches raw single-finger touch notifications and raises the
//! `dragstart`/`dragenter`/`dragover`/`dragleave`/`drop`/`dragend` and
//! `click`/`dblclick`/`contextmenu` events that code written for a mouse expects. The document
//! itself stays with the host, behind [`DocumentHost`].
#![forbid(unsafe_code)]

pub mod touch_drag;

pub use touch_drag::{
    dispatch, resolve_drop_target, AttachError, DataTransfer, DocumentHost, EventKind, Handled,
    PressHoldOptions, SyntheticEvent, TouchDragOptions, TouchDragTracker, TouchInput,
    TrackerRegistry, EFFECT_ALLOWED,
};
