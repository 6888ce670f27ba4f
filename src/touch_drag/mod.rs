use std::collections::VecDeque;
use std::time::Duration;

use egui::{Pos2, Vec2};

mod carrier;
mod debug;
mod dispatch;
mod document;
mod event;
mod options;
mod registry;
mod resolve;
mod session;

#[cfg(test)]
mod test_document;

pub use carrier::{DataTransfer, EFFECT_ALLOWED};
pub use dispatch::dispatch;
pub use document::{DocumentHost, Handled, TouchInput};
pub use event::{EventKind, SyntheticEvent};
pub use options::{PressHoldOptions, TouchDragOptions};
pub use registry::{AttachError, TrackerRegistry};
pub use resolve::resolve_drop_target;

use registry::Registration;
use resolve::closest_draggable;
use session::{Drag, Phase, Press, Surrogate};

/// Turns single-finger touch input into the drag-and-drop and click events a mouse would produce.
///
/// Feed it the host's raw touch notifications ([`Self::on_touch_start`], [`Self::on_touch_move`],
/// [`Self::on_touch_end`], [`Self::on_touch_cancel`]) and it raises, through
/// [`DocumentHost::dispatch_event`]:
/// - `click` for a tap, `dblclick` for a second tap shortly after the first,
/// - `contextmenu` when a finger rests long enough,
/// - `dragstart`/`dragenter`/`dragover`/`dragleave`/`drop`/`dragend` when a finger drags an
///   element marked draggable, with a dimmed surrogate following the finger.
///
/// Time never advances on its own: call [`Self::advance`] once [`Self::next_deadline`] has passed,
/// and [`Self::on_frame`] on the next display refresh whenever [`Self::needs_frame`] is true.
///
/// Obtain one through [`TrackerRegistry::attach`].
#[derive(Debug)]
pub struct TouchDragTracker<E> {
    pub options: TouchDragOptions,

    phase: Phase<E>,
    data_transfer: DataTransfer,

    /// End of the previous touch, the baseline for double-tap detection.
    last_release: Option<Duration>,

    debug_log: VecDeque<String>,
    debug_sequence: u64,

    _registration: Registration,
}

impl<E> TouchDragTracker<E> {
    fn new(options: TouchDragOptions, registration: Registration) -> Self {
        Self {
            options,
            phase: Phase::Idle,
            data_transfer: DataTransfer::default(),
            last_release: None,
            debug_log: VecDeque::new(),
            debug_sequence: 0,
            _registration: registration,
        }
    }

    /// No touch is being tracked.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// A drag is active: the surrogate exists and drop targets are being resolved.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// Whether the current touch found a draggable element (dragging or about to).
    pub fn is_armed(&self) -> bool {
        match &self.phase {
            Phase::Idle => false,
            Phase::Pressed(press) => press.candidate.is_some(),
            Phase::Dragging(_) => true,
        }
    }

    /// The element being dragged, while a drag is active.
    pub fn drag_source(&self) -> Option<&E> {
        match &self.phase {
            Phase::Dragging(drag) => Some(&drag.source),
            Phase::Idle | Phase::Pressed(_) => None,
        }
    }

    /// The clone that follows the finger, while a drag is active.
    pub fn surrogate(&self) -> Option<&E> {
        match &self.phase {
            Phase::Dragging(drag) => Some(&drag.surrogate.element),
            Phase::Idle | Phase::Pressed(_) => None,
        }
    }

    /// Element that would receive `drop` if the finger lifted now.
    pub fn drop_target(&self) -> Option<&E> {
        match &self.phase {
            Phase::Dragging(drag) => drag.drop_target.as_ref(),
            Phase::Idle | Phase::Pressed(_) => None,
        }
    }

    /// The payload shared by all drag events of the current touch.
    pub fn data_transfer(&self) -> &DataTransfer {
        &self.data_transfer
    }

    /// Earliest time at which [`Self::advance`] has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.phase.next_deadline()
    }

    /// Whether a surrogate move is waiting for [`Self::on_frame`].
    pub fn needs_frame(&self) -> bool {
        matches!(
            &self.phase,
            Phase::Dragging(drag) if drag.surrogate.pending_position.is_some()
        )
    }

    fn is_double_tap(&self, now: Duration) -> bool {
        self.last_release
            .and_then(|last| now.checked_sub(last))
            .is_some_and(|since| since < self.options.double_click_delay)
    }
}

impl<E: Clone + PartialEq + std::fmt::Debug> TouchDragTracker<E> {
    /// Begin tracking a touch, or raise `dblclick` if it closely follows a tap.
    ///
    /// Returns [`Handled::Yes`] when the touch armed a drag or produced a `dblclick`. The host
    /// should then suppress its default touch behavior.
    pub fn on_touch_start<D>(&mut self, doc: &mut D, input: &TouchInput<'_, E>) -> Handled
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        let Some(point) = input.single_point() else {
            // A second finger turns this into a gesture we don't emulate.
            if !self.is_idle() {
                log::debug!("multi-touch: abandoning touch gesture");
                self.debug_log_event(format!(
                    "abort multi_touch touches={}",
                    input.touches.len()
                ));
                self.finish(doc);
            }
            return Handled::No;
        };

        if !self.is_idle() {
            // The host never delivered the end of the previous touch.
            self.finish(doc);
        }
        self.debug_sequence = self.debug_sequence.wrapping_add(1);

        if input.default_prevented {
            self.debug_log_event("skip already_handled");
            return Handled::No;
        }

        if self.is_double_tap(input.time) {
            log::debug!("dblclick at {:?}", input.target);
            self.debug_log_event(format!("dblclick target={:?}", input.target));
            dispatch(
                doc,
                Some(input.target),
                EventKind::DoubleClick,
                Some(point),
                None,
            );
            self.finish(doc);
            // A third quick tap starts a new click sequence instead of another dblclick.
            self.last_release = None;
            return Handled::Yes;
        }

        if self.options.is_excluded_kind(doc.element_kind(input.target)) {
            self.debug_log_event(format!("skip excluded target={:?}", input.target));
            return Handled::No;
        }

        let candidate = closest_draggable(&*doc, input.target);
        let drag_enabled_at = match (&candidate, self.options.press_hold) {
            (Some(_), Some(hold)) => Some(input.time + hold.delay),
            _ => None,
        };
        let handled = if candidate.is_some() {
            Handled::Yes
        } else {
            Handled::No
        };

        log::debug!(
            "touch start target={:?} candidate={candidate:?}",
            input.target
        );
        self.debug_log_event(format!(
            "press target={:?} candidate={candidate:?} pos=({:.1},{:.1})",
            input.target, point.x, point.y
        ));

        self.phase = Phase::Pressed(Press {
            target: input.target.clone(),
            start: point,
            last_point: point,
            began: input.time,
            candidate,
            context_menu_at: Some(input.time + self.options.context_menu_delay),
            drag_enabled_at,
            suppress_click: false,
        });
        handled
    }

    /// Follow the finger, starting the drag once it passes the threshold.
    ///
    /// Returns [`Handled::Yes`] while the touch belongs to a drag (armed or active), meaning the
    /// host should not scroll.
    pub fn on_touch_move<D>(&mut self, doc: &mut D, input: &TouchInput<'_, E>) -> Handled
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        let Some(point) = input.single_point() else {
            return Handled::No;
        };
        let threshold = self.options.drag_threshold;
        let hold_margin = self.options.press_hold.map(|hold| hold.margin);

        match &mut self.phase {
            Phase::Idle => Handled::No,
            Phase::Dragging(_) => {
                self.update_drag(doc, point);
                Handled::Yes
            }
            Phase::Pressed(press) => {
                press.last_point = point;
                let moved = press.displacement(point);

                if press.candidate.is_none() {
                    // Not ours to drag; a long swipe is a scroll, not a tap.
                    if moved >= threshold {
                        press.suppress_click = true;
                        press.context_menu_at = None;
                    }
                    return Handled::No;
                }

                if press.drag_enabled_at.is_some() {
                    if moved <= hold_margin.unwrap_or(f32::INFINITY) {
                        return Handled::Yes;
                    }
                    press.candidate = None;
                    press.drag_enabled_at = None;
                    press.context_menu_at = None;
                    press.suppress_click = true;
                    self.debug_log_event(format!("press_hold interrupted moved={moved:.1}"));
                    return Handled::No;
                }

                if moved < threshold {
                    return Handled::Yes;
                }

                self.start_drag(doc, point);
                self.update_drag(doc, point);
                Handled::Yes
            }
        }
    }

    /// Finish the touch with `click`, or with `drop` and `dragend` after a drag.
    ///
    /// Returns [`Handled::Yes`] when a synthetic event replaced the platform's own.
    pub fn on_touch_end<D>(&mut self, doc: &mut D, input: &TouchInput<'_, E>) -> Handled
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        let pressed = matches!(self.phase, Phase::Pressed(_));
        let handled = match &self.phase {
            Phase::Idle => return Handled::No,
            Phase::Pressed(press) => {
                if press.suppress_click {
                    Handled::No
                } else {
                    log::debug!(
                        "tap target={:?} held={:?}",
                        press.target,
                        input.time.saturating_sub(press.began)
                    );
                    dispatch(
                        doc,
                        Some(&press.target),
                        EventKind::Click,
                        Some(press.last_point),
                        None,
                    );
                    Handled::Yes
                }
            }
            Phase::Dragging(drag) => {
                let point = Some(drag.last_point);
                if drag.drop_target.is_some() {
                    dispatch(
                        doc,
                        drag.drop_target.as_ref(),
                        EventKind::Drop,
                        point,
                        Some(&mut self.data_transfer),
                    );
                }
                dispatch(
                    doc,
                    Some(&drag.source),
                    EventKind::DragEnd,
                    point,
                    Some(&mut self.data_transfer),
                );
                log::debug!(
                    "drag end source={:?} target={:?}",
                    drag.source,
                    drag.drop_target
                );
                Handled::Yes
            }
        };

        self.debug_log_event(format!("release handled={handled:?}"));
        self.finish(doc);
        // Only a completed tap can be the first half of a double tap.
        let tapped = pressed && handled.is_yes();
        self.last_release = tapped.then_some(input.time);
        handled
    }

    /// Discard the touch without raising `drop`, `dragend` or `click`.
    pub fn on_touch_cancel<D>(&mut self, doc: &mut D, input: &TouchInput<'_, E>) -> Handled
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        if !self.is_idle() {
            self.debug_log_event("cancel");
        }
        log::trace!("touch cancel at {:?}", input.time);
        self.finish(doc);
        Handled::No
    }

    /// Fire every deadline (long-press, press-hold) due at or before `now`.
    pub fn advance<D>(&mut self, doc: &mut D, now: Duration)
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        while let Some(deadline) = self.next_deadline().filter(|&at| at <= now) {
            if !self.fire_deadline(doc, deadline) {
                break;
            }
        }
    }

    /// Apply the surrogate position queued by the latest move.
    ///
    /// Purely visual: hit-testing never depends on it, and after a reset there is no surrogate
    /// left to move.
    pub fn on_frame<D>(&mut self, doc: &mut D)
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        let Phase::Dragging(drag) = &mut self.phase else {
            return;
        };
        if let Some(top_left) = drag.surrogate.pending_position.take() {
            doc.set_element_position(&drag.surrogate.element, top_left);
        }
    }

    /// Abandon the current touch, if any, and undo its visual changes.
    ///
    /// Safe to call in any state, any number of times.
    pub fn reset<D>(&mut self, doc: &mut D)
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        self.finish(doc);
    }

    fn finish<D>(&mut self, doc: &mut D)
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        if let Phase::Dragging(drag) = std::mem::replace(&mut self.phase, Phase::Idle) {
            doc.set_opacity(&drag.source, drag.surrogate.source_opacity);
            doc.remove_element(&drag.surrogate.element);
        }
        self.data_transfer = DataTransfer::default();
    }

    fn fire_deadline<D>(&mut self, doc: &mut D, deadline: Duration) -> bool
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        let Phase::Pressed(press) = &mut self.phase else {
            return false;
        };

        if press.drag_enabled_at == Some(deadline) {
            press.drag_enabled_at = None;
            let point = press.last_point;
            self.debug_log_event("press_hold elapsed");
            self.start_drag(doc, point);
            self.update_drag(doc, point);
            return true;
        }

        if press.context_menu_at == Some(deadline) {
            press.context_menu_at = None;
            press.suppress_click = true;
            let target = press.target.clone();
            let point = press.last_point;
            log::debug!("long press at {target:?}");
            self.debug_log_event(format!("contextmenu target={target:?}"));
            dispatch(doc, Some(&target), EventKind::ContextMenu, Some(point), None);
            return true;
        }

        false
    }

    fn start_drag<D>(&mut self, doc: &mut D, point: Pos2)
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        let source = match &self.phase {
            Phase::Pressed(Press {
                candidate: Some(source),
                ..
            }) => source.clone(),
            Phase::Idle | Phase::Pressed(_) | Phase::Dragging(_) => return,
        };

        let Some(element) = doc.create_surrogate(&source) else {
            log::debug!("drag source {source:?} is gone, dropping the gesture");
            self.debug_log_event(format!("drag_start_failed source={source:?}"));
            self.finish(doc);
            return;
        };

        let grab_offset = doc
            .bounding_rect(&source)
            .map_or(Vec2::ZERO, |rect| point - rect.min);
        let surrogate = Surrogate {
            element,
            grab_offset,
            source_opacity: doc.opacity(&source),
            pending_position: None,
        };
        doc.set_opacity(&surrogate.element, self.options.surrogate_opacity);
        doc.set_element_position(&surrogate.element, surrogate.top_left_for(point));
        doc.set_opacity(&source, self.options.source_opacity);

        log::debug!("drag start source={source:?}");
        self.debug_log_event(format!(
            "drag_start source={source:?} grab_offset=({:.1},{:.1})",
            grab_offset.x, grab_offset.y
        ));

        self.phase = Phase::Dragging(Drag {
            source: source.clone(),
            surrogate,
            last_point: point,
            drop_target: None,
        });
        dispatch(
            doc,
            Some(&source),
            EventKind::DragStart,
            Some(point),
            Some(&mut self.data_transfer),
        );
    }

    fn update_drag<D>(&mut self, doc: &mut D, point: Pos2)
    where
        D: DocumentHost<Element = E> + ?Sized,
    {
        let Phase::Dragging(drag) = &mut self.phase else {
            return;
        };
        drag.last_point = point;
        drag.surrogate.pending_position = Some(drag.surrogate.top_left_for(point));

        // The resolver's probe is the live `dragover` for the accepting element.
        let target = resolve_drop_target(doc, point, &mut self.data_transfer);
        log::trace!("drag over ({:.1},{:.1}) target={target:?}", point.x, point.y);

        let mut changed = None;
        if target != drag.drop_target {
            dispatch(
                doc,
                drag.drop_target.as_ref(),
                EventKind::DragLeave,
                Some(point),
                Some(&mut self.data_transfer),
            );
            dispatch(
                doc,
                target.as_ref(),
                EventKind::DragEnter,
                Some(point),
                Some(&mut self.data_transfer),
            );
            changed = Some(format!(
                "hover {:?} -> {target:?}",
                drag.drop_target
            ));
            drag.drop_target = target;
        }

        if let Some(message) = changed {
            self.debug_log_event(message);
        }
    }
}
