//! Stale-result protection for superseded invocations
//!
//! Re-invoking the pipeline while a previous run is outstanding creates a
//! race: the stale result may arrive after the newer one. Each invocation
//! takes a monotonically increasing token, and the publication cell only
//! accepts a result whose token is still the latest issued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Issues one token per pipeline invocation.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    issued: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next token. Tokens start at 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

/// The last published result, guarded against stale writers.
#[derive(Debug, Default)]
pub struct Published<T> {
    slot: Mutex<Option<(u64, T)>>,
}

impl<T> Published<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(u64, T)>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Publish `value` under `token`. Returns false (dropping the value)
    /// when a newer token has been issued since.
    pub fn offer(&self, counter: &GenerationCounter, token: u64, value: T) -> bool {
        if token != counter.latest() {
            return false;
        }
        let mut slot = self.lock();
        if let Some((stored, _)) = &*slot {
            if *stored > token {
                return false;
            }
        }
        *slot = Some((token, value));
        true
    }

    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().as_ref().map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_token_publishes() {
        let counter = GenerationCounter::new();
        let cell = Published::new();

        let token = counter.issue();
        assert!(cell.offer(&counter, token, "first"));
        assert_eq!(cell.get(), Some("first"));
    }

    #[test]
    fn stale_token_is_dropped() {
        let counter = GenerationCounter::new();
        let cell = Published::new();

        let stale = counter.issue();
        let fresh = counter.issue();

        // Fresh result lands first; the stale arrival must not clobber it.
        assert!(cell.offer(&counter, fresh, "fresh"));
        assert!(!cell.offer(&counter, stale, "stale"));
        assert_eq!(cell.get(), Some("fresh"));
    }

    #[test]
    fn stale_token_is_dropped_even_into_an_empty_cell() {
        let counter = GenerationCounter::new();
        let cell: Published<&str> = Published::new();

        let stale = counter.issue();
        let _superseding = counter.issue();

        assert!(!cell.offer(&counter, stale, "stale"));
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn tokens_increase_monotonically() {
        let counter = GenerationCounter::new();
        let a = counter.issue();
        let b = counter.issue();
        assert!(b > a);
        assert_eq!(counter.latest(), b);
    }
}
