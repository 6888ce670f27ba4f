use std::time::Duration;

use egui::{Pos2, Rect};

use super::{
    DocumentHost, EventKind, Handled, SyntheticEvent, TouchDragOptions, TouchDragTracker,
    TouchInput, TrackerRegistry,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(super) struct NodeId(usize);

/// How a node's `dragover`/`drop` listener reacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Accept {
    Never,
    /// Only when the node itself is the event target.
    OwnTarget,
    /// Also for events bubbling up from descendants.
    Subtree,
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    rect: Rect,
    kind: &'static str,
    draggable: bool,
    accept: Accept,
    prevent: Vec<EventKind>,
    opacity: f32,
    attached: bool,
    surrogate_of: Option<NodeId>,
    position: Option<Pos2>,
}

/// A tiny retained tree: later nodes paint on top of earlier ones.
#[derive(Debug)]
pub(super) struct TestDocument {
    nodes: Vec<Node>,
    /// Every dispatched event, in order, as `(kind, target)`.
    pub(super) events: Vec<(EventKind, NodeId)>,
    /// Stored under `text/plain` by the `dragstart` listener of the source.
    pub(super) dragstart_payload: Option<String>,
    /// `text/plain` as seen by each `drop` listener.
    pub(super) dropped_payloads: Vec<Option<String>>,
    /// Node to detach from inside the next `dragstart` listener.
    pub(super) detach_on_dragstart: Option<NodeId>,
}

impl TestDocument {
    pub(super) const ROOT: NodeId = NodeId(0);

    pub(super) fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                rect: Rect::from_min_max(Pos2::ZERO, Pos2::new(1000.0, 1000.0)),
                kind: "body",
                draggable: false,
                accept: Accept::Never,
                prevent: Vec::new(),
                opacity: 1.0,
                attached: true,
                surrogate_of: None,
                position: None,
            }],
            events: Vec::new(),
            dragstart_payload: None,
            dropped_payloads: Vec::new(),
            detach_on_dragstart: None,
        }
    }

    pub(super) fn add(&mut self, parent: NodeId, min: (f32, f32), max: (f32, f32)) -> NodeId {
        self.nodes.push(Node {
            parent: Some(parent),
            rect: Rect::from_min_max(Pos2::new(min.0, min.1), Pos2::new(max.0, max.1)),
            kind: "div",
            draggable: false,
            accept: Accept::Never,
            prevent: Vec::new(),
            opacity: 1.0,
            attached: true,
            surrogate_of: None,
            position: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub(super) fn set_draggable(&mut self, id: NodeId) {
        self.nodes[id.0].draggable = true;
    }

    pub(super) fn set_accept(&mut self, id: NodeId, accept: Accept) {
        self.nodes[id.0].accept = accept;
    }

    pub(super) fn set_kind(&mut self, id: NodeId, kind: &'static str) {
        self.nodes[id.0].kind = kind;
    }

    pub(super) fn prevent_default_on(&mut self, id: NodeId, kind: EventKind) {
        self.nodes[id.0].prevent.push(kind);
    }

    pub(super) fn detach(&mut self, id: NodeId) {
        self.nodes[id.0].attached = false;
    }

    pub(super) fn is_attached(&self, id: NodeId) -> bool {
        self.is_connected(id)
    }

    pub(super) fn node_opacity(&self, id: NodeId) -> f32 {
        self.nodes[id.0].opacity
    }

    pub(super) fn node_position(&self, id: NodeId) -> Option<Pos2> {
        self.nodes[id.0].position
    }

    pub(super) fn live_surrogates(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| self.nodes[id.0].surrogate_of.is_some() && self.is_connected(id))
            .collect()
    }

    pub(super) fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Event sequence without `dragover`, which fires on every probe.
    pub(super) fn events_without_dragover(&self) -> Vec<(EventKind, NodeId)> {
        self.events
            .iter()
            .copied()
            .filter(|(kind, _)| *kind != EventKind::DragOver)
            .collect()
    }

    fn is_connected(&self, id: NodeId) -> bool {
        std::iter::successors(Some(id), |id| self.nodes.get(id.0).and_then(|n| n.parent))
            .all(|id| self.nodes.get(id.0).is_some_and(|n| n.attached))
    }

    fn listener_accepts(&self, current: NodeId, event: &SyntheticEvent<'_, NodeId>) -> bool {
        let node = &self.nodes[current.0];
        if node.prevent.contains(&event.kind()) {
            return true;
        }
        if !matches!(event.kind(), EventKind::DragOver | EventKind::Drop) {
            return false;
        }
        match node.accept {
            Accept::Never => false,
            Accept::OwnTarget => *event.target() == current,
            Accept::Subtree => true,
        }
    }
}

impl DocumentHost for TestDocument {
    type Element = NodeId;

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.nodes.get(element.0)?.parent
    }

    fn element_at(&self, point: Pos2) -> Option<NodeId> {
        (0..self.nodes.len()).rev().map(NodeId).find(|&id| {
            let node = &self.nodes[id.0];
            node.surrogate_of.is_none() && node.rect.contains(point) && self.is_connected(id)
        })
    }

    fn bounding_rect(&self, element: &NodeId) -> Option<Rect> {
        self.is_connected(*element)
            .then(|| self.nodes[element.0].rect)
    }

    fn is_draggable(&self, element: &NodeId) -> bool {
        self.nodes.get(element.0).is_some_and(|n| n.draggable)
    }

    fn element_kind(&self, element: &NodeId) -> &str {
        self.nodes.get(element.0).map_or("", |n| n.kind)
    }

    fn create_surrogate(&mut self, source: &NodeId) -> Option<NodeId> {
        if !self.is_connected(*source) {
            return None;
        }
        let src = &self.nodes[source.0];
        let clone = Node {
            parent: Some(Self::ROOT),
            rect: src.rect,
            kind: src.kind,
            draggable: false,
            accept: Accept::Never,
            prevent: Vec::new(),
            opacity: src.opacity,
            attached: true,
            surrogate_of: Some(*source),
            position: None,
        };
        self.nodes.push(clone);
        Some(NodeId(self.nodes.len() - 1))
    }

    fn remove_element(&mut self, element: &NodeId) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.attached = false;
        }
    }

    fn opacity(&self, element: &NodeId) -> f32 {
        self.nodes.get(element.0).map_or(1.0, |n| n.opacity)
    }

    fn set_opacity(&mut self, element: &NodeId, opacity: f32) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.opacity = opacity;
        }
    }

    fn set_element_position(&mut self, element: &NodeId, top_left: Pos2) {
        if let Some(node) = self.nodes.get_mut(element.0) {
            node.position = Some(top_left);
        }
    }

    fn dispatch_event(&mut self, event: &mut SyntheticEvent<'_, NodeId>) {
        let target = *event.target();
        self.events.push((event.kind(), target));

        if event.kind() == EventKind::DragStart {
            if let (Some(payload), Some(dt)) =
                (self.dragstart_payload.clone(), event.data_transfer_mut())
            {
                dt.set("text/plain", payload);
            }
            if let Some(id) = self.detach_on_dragstart.take() {
                self.detach(id);
            }
        }
        if event.kind() == EventKind::Drop {
            let seen = event
                .data_transfer()
                .and_then(|dt| dt.get::<String>("text/plain"))
                .cloned();
            self.dropped_payloads.push(seen);
        }

        let mut current = Some(target);
        while let Some(id) = current {
            if self.listener_accepts(id, event) {
                event.prevent_default();
            }
            current = self.parent(&id);
        }
    }
}

pub(super) fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// A tracker wired to a [`TestDocument`], driven with millisecond timestamps.
pub(super) struct Harness {
    pub(super) doc: TestDocument,
    pub(super) tracker: TouchDragTracker<NodeId>,
    _registry: TrackerRegistry,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self::with_options(TouchDragOptions::default())
    }

    pub(super) fn with_options(options: TouchDragOptions) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let registry = TrackerRegistry::new();
        let tracker = registry.attach(options).expect("fresh registry must attach");
        Self {
            doc: TestDocument::new(),
            tracker,
            _registry: registry,
        }
    }

    pub(super) fn down(&mut self, target: NodeId, point: Pos2, at: u64) -> Handled {
        let touches = [point];
        let input = TouchInput::new(&target, &touches, ms(at));
        self.tracker.on_touch_start(&mut self.doc, &input)
    }

    pub(super) fn down_many(&mut self, target: NodeId, points: &[Pos2], at: u64) -> Handled {
        let input = TouchInput::new(&target, points, ms(at));
        self.tracker.on_touch_start(&mut self.doc, &input)
    }

    pub(super) fn move_to(&mut self, target: NodeId, point: Pos2, at: u64) -> Handled {
        let touches = [point];
        let input = TouchInput::new(&target, &touches, ms(at));
        self.tracker.on_touch_move(&mut self.doc, &input)
    }

    pub(super) fn up(&mut self, target: NodeId, at: u64) -> Handled {
        let input = TouchInput::new(&target, &[], ms(at));
        self.tracker.on_touch_end(&mut self.doc, &input)
    }

    pub(super) fn cancel(&mut self, target: NodeId, at: u64) -> Handled {
        let input = TouchInput::new(&target, &[], ms(at));
        self.tracker.on_touch_cancel(&mut self.doc, &input)
    }

    pub(super) fn advance(&mut self, at: u64) {
        self.tracker.advance(&mut self.doc, ms(at));
    }

    pub(super) fn frame(&mut self) {
        self.tracker.on_frame(&mut self.doc);
    }

    pub(super) fn tap(&mut self, target: NodeId, point: Pos2, at: u64) {
        self.down(target, point, at);
        self.advance(at + 50);
        self.up(target, at + 50);
    }
}

/// A draggable card in a list, with two drop zones to its right.
///
/// ```text
/// list (0,0)-(400,400)          zone_a (500,0)-(700,200), accepts; zone_a_inner inside it
///   card (10,10)-(110,60)*      zone_b (500,300)-(700,500), accepts
///     label, field (input)
///   plain (10,100)-(110,150)
/// ```
pub(super) struct Scene {
    pub(super) list: NodeId,
    pub(super) card: NodeId,
    pub(super) label: NodeId,
    pub(super) field: NodeId,
    pub(super) plain: NodeId,
    pub(super) zone_a: NodeId,
    pub(super) zone_a_inner: NodeId,
    pub(super) zone_b: NodeId,
}

impl Scene {
    pub(super) fn build(doc: &mut TestDocument) -> Self {
        let root = TestDocument::ROOT;
        let list = doc.add(root, (0.0, 0.0), (400.0, 400.0));
        let card = doc.add(list, (10.0, 10.0), (110.0, 60.0));
        doc.set_draggable(card);
        let label = doc.add(card, (20.0, 20.0), (60.0, 40.0));
        let field = doc.add(card, (70.0, 15.0), (105.0, 35.0));
        doc.set_kind(field, "input");
        let plain = doc.add(list, (10.0, 100.0), (110.0, 150.0));

        let zone_a = doc.add(root, (500.0, 0.0), (700.0, 200.0));
        doc.set_accept(zone_a, Accept::Subtree);
        let zone_a_inner = doc.add(zone_a, (520.0, 20.0), (560.0, 60.0));
        let zone_b = doc.add(root, (500.0, 300.0), (700.0, 500.0));
        doc.set_accept(zone_b, Accept::Subtree);

        Self {
            list,
            card,
            label,
            field,
            plain,
            zone_a,
            zone_a_inner,
            zone_b,
        }
    }
}
