//! In-process ordered notification bus.
//!
//! Requests are queued on `enqueue` and handed to handlers when the host
//! calls `deliver_pending`, so senders never wait on handler work.

use crate::broadcast::request::ChangeRequest;
use crate::error::{CatalogError, CatalogResult};
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Receiver of change requests.
pub trait ChangeRequestHandler: Send + Sync {
    /// Stable id, unique per bus.
    fn handler_id(&self) -> &str;
    /// Higher values run first.
    fn priority(&self) -> i32;
    /// Inspects or rewrites `request`; call `delivery.abort()` to stop
    /// propagation to lower-priority handlers.
    fn on_change_request(&self, request: &mut ChangeRequest, delivery: &mut Delivery);
}

/// Per-request propagation control handed to each handler.
#[derive(Debug, Default)]
pub struct Delivery {
    aborted: bool,
}

impl Delivery {
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

/// Outcome of delivering one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub request_id: Uuid,
    /// Handler ids in invocation order.
    pub invoked: Vec<String>,
    pub aborted_by: Option<String>,
    /// Request as left by the last invoked handler.
    pub request: ChangeRequest,
}

struct Registration {
    priority: i32,
    handler: Arc<dyn ChangeRequestHandler>,
}

/// Ordered broadcast channel for change requests.
pub struct NotificationBus {
    handlers: Vec<Registration>,
    pending: Mutex<VecDeque<ChangeRequest>>,
    open: AtomicBool,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            pending: Mutex::new(VecDeque::new()),
            open: AtomicBool::new(true),
        }
    }

    /// Registers a handler. Equal priorities keep registration order.
    pub fn register(&mut self, handler: Arc<dyn ChangeRequestHandler>) -> CatalogResult<()> {
        let handler_id = handler.handler_id().trim().to_string();
        if handler_id.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "handler id must not be empty".to_string(),
            ));
        }
        if self
            .handlers
            .iter()
            .any(|entry| entry.handler.handler_id() == handler_id)
        {
            return Err(CatalogError::InvalidArgument(format!(
                "handler already registered: {handler_id}"
            )));
        }

        let priority = handler.priority();
        let index = self
            .handlers
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(self.handlers.len());
        self.handlers.insert(index, Registration { priority, handler });
        debug!(
            "event=handler_register module=broadcast status=ok handler={} priority={}",
            handler_id, priority
        );
        Ok(())
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Handler ids in delivery order.
    pub fn handler_ids(&self) -> Vec<String> {
        self.handlers
            .iter()
            .map(|entry| entry.handler.handler_id().to_string())
            .collect()
    }

    /// Accepts a request for later delivery.
    ///
    /// # Errors
    /// - `ChannelUnavailable` after `shutdown()`.
    pub fn enqueue(&self, request: ChangeRequest) -> CatalogResult<()> {
        if !self.is_open() {
            return Err(CatalogError::ChannelUnavailable);
        }
        self.lock_pending()?.push_back(request);
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }

    /// Delivers every queued request in FIFO order.
    ///
    /// Requests enqueued by handlers during this call wait for the next one.
    /// Requests leave the queue one at a time, so a panicking handler only
    /// loses the request it was handling.
    pub fn deliver_pending(&self) -> CatalogResult<Vec<DeliveryReport>> {
        let batch_len = self.lock_pending()?.len();
        let mut reports = Vec::with_capacity(batch_len);
        for _ in 0..batch_len {
            let Some(request) = self.lock_pending()?.pop_front() else {
                break;
            };
            reports.push(self.deliver(request));
        }
        Ok(reports)
    }

    /// Stops accepting requests. Queued requests stay deliverable.
    pub fn shutdown(&self) {
        self.open.store(false, Ordering::SeqCst);
        info!("event=bus_shutdown module=broadcast status=ok");
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn lock_pending(&self) -> CatalogResult<MutexGuard<'_, VecDeque<ChangeRequest>>> {
        self.pending
            .lock()
            .map_err(|_| CatalogError::ChannelUnavailable)
    }

    fn deliver(&self, mut request: ChangeRequest) -> DeliveryReport {
        let request_id = request.request_id;
        let mut delivery = Delivery::default();
        let mut invoked = Vec::new();
        let mut aborted_by = None;

        for entry in &self.handlers {
            let handler_id = entry.handler.handler_id().to_string();
            entry.handler.on_change_request(&mut request, &mut delivery);
            invoked.push(handler_id.clone());
            if delivery.is_aborted() {
                aborted_by = Some(handler_id);
                break;
            }
        }

        if invoked.is_empty() {
            warn!(
                "event=change_request_deliver module=broadcast status=unhandled request_id={}",
                request_id
            );
        } else {
            info!(
                "event=change_request_deliver module=broadcast status=ok request_id={} handlers={} aborted={}",
                request_id,
                invoked.len(),
                aborted_by.is_some()
            );
        }

        DeliveryReport {
            request_id,
            invoked,
            aborted_by,
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeRequestHandler, Delivery, NotificationBus};
    use crate::broadcast::request::ChangeRequest;
    use crate::error::CatalogError;
    use crate::model::locator::Locator;
    use std::sync::Arc;

    struct Named {
        id: &'static str,
        priority: i32,
    }

    impl ChangeRequestHandler for Named {
        fn handler_id(&self) -> &str {
            self.id
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_change_request(&self, _request: &mut ChangeRequest, _delivery: &mut Delivery) {}
    }

    fn request() -> ChangeRequest {
        ChangeRequest::theme(
            Locator::parse("content://com.tmobile.thememanager.themes/theme/pkgA/t1").unwrap(),
        )
    }

    #[test]
    fn orders_handlers_by_descending_priority_then_registration() {
        let mut bus = NotificationBus::new();
        for (id, priority) in [("low", -5), ("mid-a", 10), ("high", 100), ("mid-b", 10)] {
            bus.register(Arc::new(Named { id, priority })).unwrap();
        }
        assert_eq!(bus.handler_ids(), ["high", "mid-a", "mid-b", "low"]);
    }

    #[test]
    fn rejects_duplicate_and_blank_handler_ids() {
        let mut bus = NotificationBus::new();
        bus.register(Arc::new(Named { id: "applier", priority: 0 }))
            .unwrap();
        let err = bus
            .register(Arc::new(Named { id: "applier", priority: 5 }))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));

        let err = bus
            .register(Arc::new(Named { id: "  ", priority: 5 }))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
        assert_eq!(bus.handler_count(), 1);
    }

    #[test]
    fn shutdown_rejects_new_requests_but_keeps_queue() {
        let bus = NotificationBus::new();
        bus.enqueue(request()).unwrap();
        bus.shutdown();

        let err = bus.enqueue(request()).unwrap_err();
        assert!(matches!(err, CatalogError::ChannelUnavailable));
        assert_eq!(bus.pending_count(), 1);

        let reports = bus.deliver_pending().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].invoked.is_empty());
        assert_eq!(bus.pending_count(), 0);
    }
}
