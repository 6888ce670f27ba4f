use std::cell::Cell;
use std::rc::Rc;

use super::TouchDragTracker;
use super::options::TouchDragOptions;

/// Hands out the single [`TouchDragTracker`] allowed per document.
///
/// Two trackers fed from the same touch stream would raise every synthetic event twice, so a
/// second [`Self::attach`] while the first tracker is alive fails. Dropping the tracker frees the
/// slot again.
#[derive(Debug, Default)]
pub struct TrackerRegistry {
    attached: Rc<Cell<bool>>,
}

impl TrackerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Create the tracker for this document.
    ///
    /// # Errors
    /// [`AttachError::AlreadyAttached`] if a tracker from this registry is still alive.
    pub fn attach<E>(&self, options: TouchDragOptions) -> Result<TouchDragTracker<E>, AttachError> {
        if self.attached.replace(true) {
            log::error!("a touch drag tracker is already attached to this document");
            return Err(AttachError::AlreadyAttached);
        }
        log::debug!("touch drag tracker attached");
        Ok(TouchDragTracker::new(
            options,
            Registration {
                slot: Rc::clone(&self.attached),
            },
        ))
    }
}

/// Keeps the registry slot claimed for as long as the tracker lives.
#[derive(Debug)]
pub(super) struct Registration {
    slot: Rc<Cell<bool>>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.slot.set(false);
        log::debug!("touch drag tracker detached");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachError {
    AlreadyAttached,
}

impl std::fmt::Display for AttachError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyAttached => {
                write!(f, "a touch drag tracker is already attached to this document")
            }
        }
    }
}

impl std::error::Error for AttachError {}
