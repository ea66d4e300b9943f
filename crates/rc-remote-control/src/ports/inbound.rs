//! Inbound Ports (Driving Ports)
//!
//! Hooks the transport drives on a bus component. Every hook defaults to a
//! no-op, so a component overrides only what it handles.

use hmi_types::{RpcErrorReply, RpcNotification, RpcRequest, RpcResponse};

/// Bus component lifecycle and traffic hooks.
pub trait RpcObserver {
    /// Registration acknowledged; the component may send from now on.
    fn on_registered(&mut self) {}

    /// Registration withdrawn; no more requests will arrive.
    fn on_unregistered(&mut self) {}

    /// Underlying connection lost.
    fn on_disconnected(&mut self) {}

    /// Inbound request expecting a reply.
    fn on_request(&mut self, _request: RpcRequest) {}

    /// Reply to a request this component sent.
    fn on_result(&mut self, _response: RpcResponse) {}

    /// Error reply to a request this component sent.
    fn on_error(&mut self, _error: RpcErrorReply) {}

    /// Notification delivered to this component.
    fn on_notification(&mut self, _notification: RpcNotification) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct CountingObserver {
        requests: usize,
    }

    impl RpcObserver for CountingObserver {
        fn on_request(&mut self, _request: RpcRequest) {
            self.requests += 1;
        }
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let mut observer = CountingObserver::default();
        observer.on_registered();
        observer.on_notification(RpcNotification::new("RC.OnX", json!({})));
        observer.on_unregistered();
        observer.on_disconnected();
        assert_eq!(observer.requests, 0);

        observer.on_request(RpcRequest::new(1, "RC.IsReady", None));
        assert_eq!(observer.requests, 1);
    }
}
