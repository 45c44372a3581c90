use std::collections::BTreeMap;

use tracing::debug;

/// A monotonic ticket for one server request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(u64);

/// Orders overlapping requests so the UI never applies a response older
/// than the latest user intent.
///
/// Each scope (a dropdown, a project's load slot) tracks the newest ticket
/// it issued; `accept` admits only that ticket. Cancelling a scope
/// invalidates everything outstanding for it.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: u64,
    latest: BTreeMap<String, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a scope, superseding any earlier ticket.
    pub fn issue(&mut self, scope: &str) -> RequestId {
        self.next += 1;
        self.latest.insert(scope.to_string(), self.next);
        RequestId(self.next)
    }

    /// A response may be applied only when its ticket is still the newest
    /// for its scope.
    pub fn accept(&self, scope: &str, id: RequestId) -> bool {
        self.latest.get(scope) == Some(&id.0)
    }

    /// Drop a scope entirely; outstanding responses for it become stale.
    pub fn cancel(&mut self, scope: &str) {
        if self.latest.remove(scope).is_some() {
            debug!(scope, "in-flight requests cancelled");
        }
    }

    /// Cancel every scope under a prefix, e.g. all requests of an
    /// abandoned project.
    pub fn cancel_prefix(&mut self, prefix: &str) {
        self.latest.retain(|scope, _| !scope.starts_with(prefix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue("counties");
        let second = tracker.issue("counties");
        assert!(!tracker.accept("counties", first));
        assert!(tracker.accept("counties", second));
    }

    #[test]
    fn scopes_are_independent() {
        let mut tracker = RequestTracker::new();
        let counties = tracker.issue("counties");
        let datasets = tracker.issue("datasets");
        assert!(tracker.accept("counties", counties));
        assert!(tracker.accept("datasets", datasets));
    }

    #[test]
    fn cancel_invalidates_outstanding_tickets() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue("load:proj_1");
        tracker.cancel_prefix("load:proj_1");
        assert!(!tracker.accept("load:proj_1", ticket));
    }
}
