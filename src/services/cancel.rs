// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cancellation tied to the lifetime of a view.

use crate::error::{AppError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Cancellation handle shared by every request a view starts.
///
/// Clones observe the same state. Once cancelled, a scope stays cancelled.
#[derive(Clone, Debug)]
pub struct ViewScope {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Cancels the scope when dropped.
    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            scope: self.clone(),
        }
    }

    /// Run `fut` unless the scope is cancelled first.
    ///
    /// A result that completes after cancellation is discarded.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(AppError::Cancelled),
            result = fut => {
                if self.is_cancelled() {
                    Err(AppError::Cancelled)
                } else {
                    result
                }
            }
        }
    }
}

/// Drop guard returned by [`ViewScope::guard`].
#[derive(Debug)]
pub struct ScopeGuard {
    scope: ViewScope,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancelled_scope_rejects_new_work() {
        let scope = ViewScope::new();
        scope.cancel();
        let out = scope.run(async { Ok(1) }).await;
        assert!(matches!(out, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_guard_drop_cancels_in_flight_work() {
        let scope = ViewScope::new();
        let guard = scope.guard();

        let worker = {
            let scope = scope.clone();
            tokio::spawn(async move {
                scope
                    .run(async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok(())
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);

        let out = tokio::time::timeout(Duration::from_secs(5), worker)
            .await
            .expect("worker should finish promptly")
            .expect("task should not panic");
        assert!(matches!(out, Err(AppError::Cancelled)));
        assert!(scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_uncancelled_scope_passes_result_through() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { Ok(7) }).await.unwrap(), 7);
    }
}
