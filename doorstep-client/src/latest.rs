//! Latest-wins guard for overlapping requests
//!
//! Every dispatch takes a ticket from a monotonically increasing counter.
//! When the response arrives it is applied only if its ticket is still the
//! most recently issued one; anything older is dropped. Requests are never
//! aborted, superseded responses are simply ignored.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence token of one dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and tells whether a ticket is still the latest
#[derive(Debug, Default)]
pub struct LatestWins {
    issued: AtomicU64,
}

impl LatestWins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next ticket, superseding all earlier ones
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer ticket has been issued since `ticket`
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Run `fut` under a fresh ticket; `None` if it was superseded meanwhile
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let ticket = self.issue();
        let output = fut.await;
        if self.is_current(ticket) {
            Some(output)
        } else {
            tracing::debug!(ticket = ticket.0, "Discarding superseded response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn test_newer_ticket_supersedes() {
        let guard = LatestWins::new();
        let a = guard.issue();
        assert!(guard.is_current(a));
        let b = guard.issue();
        assert!(!guard.is_current(a));
        assert!(guard.is_current(b));
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_out_of_order_resolution_keeps_latest() {
        let guard = LatestWins::new();
        let (tx_a, rx_a) = oneshot::channel::<&str>();
        let (tx_b, rx_b) = oneshot::channel::<&str>();

        let first = guard.run(async { rx_a.await.unwrap() });
        let second = guard.run(async { rx_b.await.unwrap() });
        let release = async {
            tx_b.send("B").unwrap();
            tokio::task::yield_now().await;
            tx_a.send("A").unwrap();
        };

        let (a, b, ()) = tokio::join!(first, second, release);
        assert_eq!(a, None);
        assert_eq!(b, Some("B"));
    }
}
