//! Change notification registry.
//!
//! State changes enqueue events instead of invoking listeners directly; the
//! embedding layer flushes the queue at a task boundary, so a listener is
//! never called synchronously within the mutation that triggered it and can
//! safely call back into the widget.

use std::fmt;
use std::sync::Arc;

/// Outward change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The logical viewport changed (pan, zoom or reset).
    ViewportChanged,
    /// The committed segment selection changed.
    SegmentChanged,
}

/// Callback type for event listeners.
pub type EventListener = Arc<dyn Fn(ViewerEvent) + Send + Sync>;

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Listener registry with a pending-event queue.
#[derive(Default)]
pub(crate) struct EventQueue {
    listeners: Vec<(ListenerId, ViewerEvent, EventListener)>,
    pending: Vec<ViewerEvent>,
    next_id: u64,
}

impl EventQueue {
    /// Register a listener for one event kind.
    pub(crate) fn add_listener(&mut self, event: ViewerEvent, listener: EventListener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, event, listener));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Queue an event for the next flush; duplicates collapse.
    pub(crate) fn enqueue(&mut self, event: ViewerEvent) {
        if !self.pending.contains(&event) {
            self.pending.push(event);
        }
    }

    /// Whether any events are waiting to be flushed.
    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the queued events, leaving the queue empty.
    pub(crate) fn take_pending(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Snapshot the listeners registered for `event`.
    pub(crate) fn listeners_for(&self, event: ViewerEvent) -> Vec<EventListener> {
        self.listeners
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect()
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending)
            .finish()
    }
}
