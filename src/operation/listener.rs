//! Listener contract for operation lifecycle notifications

use std::sync::Arc;

use super::types::{
    OperationDescriptor, OperationFinishEvent, OperationId, OperationProgressEvent,
    OperationStartEvent,
};

/// Receives lifecycle notifications for every operation the engine runs.
///
/// Notifications arrive from many worker threads at once. For a single
/// operation `started` precedes `finished`, and `finished` arrives at most once.
pub trait OperationListener: Send + Sync {
    fn started(&self, operation: &OperationDescriptor, event: &OperationStartEvent);

    fn progress(&self, operation_id: OperationId, event: &OperationProgressEvent);

    fn finished(&self, operation: &OperationDescriptor, event: &OperationFinishEvent);
}

impl<L: OperationListener + ?Sized> OperationListener for Arc<L> {
    fn started(&self, operation: &OperationDescriptor, event: &OperationStartEvent) {
        (**self).started(operation, event)
    }

    fn progress(&self, operation_id: OperationId, event: &OperationProgressEvent) {
        (**self).progress(operation_id, event)
    }

    fn finished(&self, operation: &OperationDescriptor, event: &OperationFinishEvent) {
        (**self).finished(operation, event)
    }
}

/// Forwards notifications to several listeners.
///
/// Starts and progress go out in registration order, finishes in reverse
/// order, so a listener added first sees an operation for the whole time any
/// later listener does.
#[derive(Default)]
pub struct ListenerBroadcast {
    listeners: Vec<Arc<dyn OperationListener>>,
}

impl ListenerBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn OperationListener>) {
        self.listeners.push(listener);
    }

    pub fn with_listener(mut self, listener: Arc<dyn OperationListener>) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl OperationListener for ListenerBroadcast {
    fn started(&self, operation: &OperationDescriptor, event: &OperationStartEvent) {
        for listener in &self.listeners {
            listener.started(operation, event);
        }
    }

    fn progress(&self, operation_id: OperationId, event: &OperationProgressEvent) {
        for listener in &self.listeners {
            listener.progress(operation_id, event);
        }
    }

    fn finished(&self, operation: &OperationDescriptor, event: &OperationFinishEvent) {
        for listener in self.listeners.iter().rev() {
            listener.finished(operation, event);
        }
    }
}
