//! Bounded worker pool for page fetches
//!
//! Every frontier node of a level gets its own task; the pool's semaphore
//! caps how many of them are fetching at once so that neither the target
//! site nor the local SOCKS5 proxy is flooded.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Fixed-size pool of fetch slots
#[derive(Debug, Clone)]
pub struct WorkerPool {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    size: usize,
}

impl WorkerPool {
    /// Creates a pool with `size` slots (at least one)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Total number of slots
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for a free slot
    ///
    /// The slot is released when the returned permit is dropped.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore).acquire_owned().await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_size_becomes_one() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let pool = WorkerPool::new(2);
        let first = pool.acquire().await;
        assert!(first.is_some());
        assert_eq!(pool.available(), 1);

        drop(first);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut tasks = tokio::task::JoinSet::new();

        for _ in 0..12 {
            let pool = pool.clone();
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            tasks.spawn(async move {
                let _permit = pool.acquire().await;
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }

        while tasks.join_next().await.is_some() {}

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(pool.available(), 3);
    }
}
