use egui::Pos2;

use super::carrier::DataTransfer;
use super::document::DocumentHost;
use super::event::{EventKind, SyntheticEvent};

/// Fire `kind` at `target` and report whether a listener suppressed the default action.
///
/// A missing target is a no-op that reports "not suppressed". This return value is the only
/// signal host listeners can send back into the tracker.
pub fn dispatch<D: DocumentHost + ?Sized>(
    doc: &mut D,
    target: Option<&D::Element>,
    kind: EventKind,
    point: Option<Pos2>,
    data_transfer: Option<&mut DataTransfer>,
) -> bool {
    let Some(target) = target else {
        return false;
    };

    let mut event = SyntheticEvent::new(kind, target.clone(), point, data_transfer);
    doc.dispatch_event(&mut event);

    let prevented = event.default_prevented();
    log::trace!("dispatch {kind} target={target:?} prevented={prevented}");
    prevented
}
