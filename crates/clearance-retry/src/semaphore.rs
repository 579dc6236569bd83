//! A bounded counting semaphore used to cap parallel jobs, parallel
//! per-job files, and in-flight LLM calls (§5: "Concurrency budgets").

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A counting semaphore parameterized by a positive integer. Acquisitions
/// block until a permit is free; the permit is released automatically when
/// the returned guard is dropped, on every exit path including panics
/// unwinding through it.
#[derive(Clone)]
pub struct BoundedSemaphore {
    inner: Arc<Semaphore>,
}

impl BoundedSemaphore {
    /// Create a semaphore with `permits` concurrent slots.
    ///
    /// # Panics
    ///
    /// Panics if `permits` is zero; a semaphore with no permits can never
    /// be acquired, which is never the intended configuration for `J_max`,
    /// `F_max`, or `LLM_global_max`.
    #[must_use]
    pub fn new(permits: usize) -> Self {
        assert!(permits > 0, "BoundedSemaphore requires at least one permit");
        Self {
            inner: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Acquire a permit, suspending until one is available.
    ///
    /// The semaphore is never closed for the lifetime of this engine, so
    /// the only failure mode `tokio::sync::Semaphore::acquire_owned` has
    /// (the semaphore being explicitly closed) cannot occur here.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.inner
            .clone()
            .acquire_owned()
            .await
            .expect("BoundedSemaphore is never closed")
    }

    /// Number of permits currently available, for diagnostics.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.inner.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn bounds_concurrent_access() {
        let sem = BoundedSemaphore::new(2);
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let sem = sem.clone();
            let concurrent = concurrent.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire().await;
                let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                concurrent.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for h in handles {
            h.await.unwrap();
        }

        assert!(max_seen.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn permit_releases_on_early_return() {
        let sem = BoundedSemaphore::new(1);

        async fn do_work(sem: &BoundedSemaphore) -> Result<(), &'static str> {
            let _permit = sem.acquire().await;
            Err("boom")
        }

        assert!(do_work(&sem).await.is_err());
        // If the permit hadn't been released, this would hang.
        let _permit = tokio::time::timeout(Duration::from_secs(1), sem.acquire())
            .await
            .expect("permit should have been released");
    }
}
