use itertools::Itertools as _;

use super::TouchDragTracker;

impl<E> TouchDragTracker<E> {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message.into());
    }

    fn push_debug_log_line(&mut self, message: String) {
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[touch {}] {}", self.debug_sequence, message));
    }

    /// Recorded gesture decisions, oldest first, one per line.
    ///
    /// Empty unless [`super::TouchDragOptions::debug_event_log`] is enabled.
    pub fn debug_log_text(&self) -> String {
        self.debug_log.iter().join("\n")
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }
}
