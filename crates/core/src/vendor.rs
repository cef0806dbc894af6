//! Vendor call capability — the injected stand-in for a destination's global
//! tracking function (`pintrk`, `window.Sentry`, ...).
//!
//! Adapters accept an `Arc<dyn VendorSink>` at construction and never look the
//! entry point up from ambient scope, so dispatch stays substitutable in
//! tests and the host controls when the real client is wired in.

use serde_json::Value;
use std::sync::{Arc, Mutex};

/// The verb of a vendor invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorVerb {
    Track,
    Set,
    Identify,
    Configure,
}

/// One invocation of a destination's tracking entry point: a verb, an
/// optional vendor event name, and an optional flat-or-nested payload.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorCall {
    pub verb: VendorVerb,
    pub event: Option<String>,
    pub payload: Option<Value>,
}

impl VendorCall {
    pub fn track(event: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            verb: VendorVerb::Track,
            event: Some(event.into()),
            payload,
        }
    }

    pub fn set(payload: Value) -> Self {
        Self {
            verb: VendorVerb::Set,
            event: None,
            payload: Some(payload),
        }
    }

    pub fn identify(payload: Value) -> Self {
        Self {
            verb: VendorVerb::Identify,
            event: None,
            payload: Some(payload),
        }
    }

    pub fn configure(payload: Value) -> Self {
        Self {
            verb: VendorVerb::Configure,
            event: None,
            payload: Some(payload),
        }
    }
}

/// Trait for invoking a destination's vendor client. Implementations wrap
/// whatever entry point the host acquired (a loaded tag, an SDK handle).
pub trait VendorSink: Send + Sync {
    fn call(&self, call: VendorCall);
}

/// No-op sink for hosts that have not wired a vendor client.
pub struct NoOpSink;

impl VendorSink for NoOpSink {
    fn call(&self, _call: VendorCall) {}
}

/// In-memory sink that captures calls for testing.
#[derive(Default)]
pub struct CaptureSink {
    calls: Mutex<Vec<VendorCall>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<VendorCall> {
        self.calls.lock().expect("vendor sink mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().expect("vendor sink mutex poisoned").len()
    }

    pub fn count_verb(&self, verb: VendorVerb) -> usize {
        self.calls
            .lock()
            .expect("vendor sink mutex poisoned")
            .iter()
            .filter(|c| c.verb == verb)
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().expect("vendor sink mutex poisoned").clear();
    }
}

impl VendorSink for CaptureSink {
    fn call(&self, call: VendorCall) {
        self.calls.lock().expect("vendor sink mutex poisoned").push(call);
    }
}

/// Convenience: a no-op sink for adapters that should go nowhere.
pub fn noop_sink() -> Arc<dyn VendorSink> {
    Arc::new(NoOpSink)
}

/// Convenience: a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capture_sink() {
        let sink = capture_sink();
        assert_eq!(sink.count(), 0);

        sink.call(VendorCall::track("PageVisit", None));
        sink.call(VendorCall::set(json!({ "em": "a@b.com" })));

        assert_eq!(sink.count(), 2);
        assert_eq!(sink.count_verb(VendorVerb::Track), 1);
        assert_eq!(sink.count_verb(VendorVerb::Set), 1);

        let calls = sink.calls();
        assert_eq!(calls[0].event.as_deref(), Some("PageVisit"));
        assert_eq!(calls[1].payload, Some(json!({ "em": "a@b.com" })));

        sink.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_noop_sink() {
        let sink = noop_sink();
        // Should not panic
        sink.call(VendorCall::track("Search", Some(json!({ "search_query": "q" }))));
    }
}
