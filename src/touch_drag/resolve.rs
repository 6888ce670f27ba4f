use egui::Pos2;

use super::carrier::DataTransfer;
use super::dispatch::dispatch;
use super::document::DocumentHost;
use super::event::EventKind;

/// Find the element that accepts a drop at `point`.
///
/// Starts at the topmost element under the point and walks up the ancestry, probing each
/// candidate with a cancelable `dragover`. The first candidate whose probe gets its default
/// prevented wins; nothing above it is probed. Returns `None` if the root is passed without
/// an acceptor.
pub fn resolve_drop_target<D: DocumentHost + ?Sized>(
    doc: &mut D,
    point: Pos2,
    data_transfer: &mut DataTransfer,
) -> Option<D::Element> {
    let mut candidate = doc.element_at(point);
    while let Some(element) = candidate {
        if dispatch(
            doc,
            Some(&element),
            EventKind::DragOver,
            Some(point),
            Some(&mut *data_transfer),
        ) {
            return Some(element);
        }
        candidate = doc.parent(&element);
    }
    None
}

/// Nearest element at or above `element` that is marked draggable.
pub(super) fn closest_draggable<D: DocumentHost + ?Sized>(
    doc: &D,
    element: &D::Element,
) -> Option<D::Element> {
    std::iter::successors(Some(element.clone()), |el| doc.parent(el))
        .find(|el| doc.is_draggable(el))
}
