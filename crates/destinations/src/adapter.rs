//! Destination adapter seam — the lifecycle state machine and the dispatch
//! trait implemented by every destination.

use tagrelay_core::{CanonicalEvent, EventKind, RelayError, RelayResult};

/// Lifecycle of a destination adapter. `Ready` is terminal for the adapter's
/// active life. Queuing calls that arrive before `Ready` is the host's job;
/// adapters assume dispatch only happens once ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Unloaded,
    Loading,
    Ready,
}

/// Adaptor trait — routes canonical events into one vendor's tracking entry
/// point. Once ready, dispatch is pure and synchronous: resolve, build,
/// invoke the sink. No buffering, no retries.
pub trait Destination: Send + Sync {
    /// Destination identifier (e.g. "pinterest").
    fn name(&self) -> &'static str;

    fn state(&self) -> AdapterState;

    /// True only once the vendor entry point is usable.
    fn is_ready(&self) -> bool {
        self.state() == AdapterState::Ready
    }

    /// Sanitize settings and begin vendor acquisition. Legal exactly once,
    /// from `Unloaded`.
    fn initialize(&mut self) -> RelayResult<()>;

    /// Load-completion signal from the host; hands the sanitized options to
    /// the vendor initializer. Legal only from `Loading`.
    fn mark_ready(&mut self) -> RelayResult<()>;

    fn identify(&self, event: &CanonicalEvent);
    fn track(&self, event: &CanonicalEvent);
    fn page(&self, event: &CanonicalEvent);

    /// Route an event to the handler for its kind.
    fn dispatch(&self, event: &CanonicalEvent) {
        match event.kind {
            EventKind::Identify => self.identify(event),
            EventKind::Track => self.track(event),
            EventKind::Page => self.page(event),
        }
    }
}

/// Guarded lifecycle transition shared by destinations.
pub(crate) fn transition(
    state: &mut AdapterState,
    from: AdapterState,
    to: AdapterState,
    op: &str,
) -> RelayResult<()> {
    if *state != from {
        return Err(RelayError::State(format!(
            "{op} is only legal from {from:?}, adapter is {state:?}"
        )));
    }
    *state = to;
    Ok(())
}
