//! Ordered "first source with data wins" evaluation.

use std::future::Future;
use std::pin::Pin;

pub type Lookup<'a, T> = Pin<Box<dyn Future<Output = Option<T>> + Send + 'a>>;

/// A list of lookups tried in order until one produces a value.
///
/// Lookups are futures, so nothing runs until [`FallbackChain::first`]
/// awaits them, and a stage after the winning one is never started.
pub struct FallbackChain<'a, T> {
    stages: Vec<(&'static str, Lookup<'a, T>)>,
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn then<F>(mut self, stage: &'static str, lookup: F) -> Self
    where
        F: Future<Output = Option<T>> + Send + 'a,
    {
        self.stages.push((stage, Box::pin(lookup)));
        self
    }

    /// Run stages in order; return the first value and the stage that made it.
    pub async fn first(self) -> Option<(&'static str, T)> {
        for (stage, lookup) in self.stages {
            match lookup.await {
                Some(value) => {
                    tracing::debug!(stage, "lookup produced data");
                    return Some((stage, value));
                }
                None => tracing::trace!(stage, "lookup produced nothing"),
            }
        }
        None
    }
}

impl<T> Default for FallbackChain<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn first_stage_with_value_wins() {
        let chain = FallbackChain::new()
            .then("a", async { None })
            .then("b", async { Some(2) })
            .then("c", async { Some(3) });
        assert_eq!(chain.first().await, Some(("b", 2)));
    }

    #[tokio::test]
    async fn later_stages_never_run() {
        let calls = AtomicUsize::new(0);
        let chain = FallbackChain::new()
            .then("a", async { Some("hit") })
            .then("b", async {
                calls.fetch_add(1, Ordering::SeqCst);
                Some("late")
            });
        assert_eq!(chain.first().await, Some(("a", "hit")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhausted_chain_is_none() {
        let chain: FallbackChain<'_, u8> = FallbackChain::new()
            .then("a", async { None })
            .then("b", async { None });
        assert_eq!(chain.first().await, None);
    }

    #[tokio::test]
    async fn empty_chain_is_none() {
        let chain: FallbackChain<'_, u8> = FallbackChain::default();
        assert_eq!(chain.first().await, None);
    }
}
