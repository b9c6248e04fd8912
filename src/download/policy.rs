//! Ordered-source fallback policy.

use anyhow::{Result, anyhow};
use log::{debug, warn};
use std::future::Future;

/// One primary source plus one mirror.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// Tries an operation against each source in order until one succeeds.
///
/// There is no delay between attempts and no retry of the same source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    sources: Vec<String>,
    max_attempts: usize,
}

impl FallbackPolicy {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            sources,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Sources that will actually be tried, in order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .take(self.max_attempts)
            .map(String::as_str)
    }

    /// Runs `attempt` for each source until it succeeds.
    /// Returns the last error when every attempt failed.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let sources: Vec<&str> = self.sources().collect();
        let mut last_error = None;

        for (index, source) in sources.iter().enumerate() {
            debug!(
                "{}: attempt {}/{} using {}",
                operation_name,
                index + 1,
                sources.len(),
                source
            );
            match attempt(source.to_string()).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if let Some(next) = sources.get(index + 1) {
                        warn!(
                            "{}: {} failed ({:#}). Trying fallback URL {}",
                            operation_name, source, e, next
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("{}: no sources to try", operation_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn policy() -> FallbackPolicy {
        FallbackPolicy::new(vec![
            "https://primary/a.tar.gz".to_string(),
            "https://mirror/a.tar.gz".to_string(),
        ])
    }

    #[tokio::test]
    async fn test_first_source_success_skips_fallback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let result = policy()
            .run("test", |url| {
                let seen = Arc::clone(&seen_clone);
                async move {
                    seen.lock().unwrap().push(url);
                    Ok::<_, anyhow::Error>(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(*seen.lock().unwrap(), vec!["https://primary/a.tar.gz"]);
    }

    #[tokio::test]
    async fn test_failure_falls_back_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let result = policy()
            .run("test", |url| {
                let seen = Arc::clone(&seen_clone);
                async move {
                    seen.lock().unwrap().push(url.clone());
                    if url.contains("primary") {
                        Err(anyhow!("connection reset"))
                    } else {
                        Ok(url)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "https://mirror/a.tar.gz");
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = Arc::new(Mutex::new(0usize));
        let calls_clone = Arc::clone(&calls);

        let result: Result<()> = policy()
            .run("test", |url| {
                let calls = Arc::clone(&calls_clone);
                async move {
                    *calls.lock().unwrap() += 1;
                    Err(anyhow!("failed at {}", url))
                }
            })
            .await;

        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(
            result.unwrap_err().to_string(),
            "failed at https://mirror/a.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_max_attempts_limits_sources() {
        let policy = FallbackPolicy::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.sources().collect::<Vec<_>>(), vec!["a", "b"]);

        let policy = policy.with_max_attempts(1);
        let calls = Arc::new(Mutex::new(0usize));
        let calls_clone = Arc::clone(&calls);
        let result: Result<()> = policy
            .run("test", |_| {
                let calls = Arc::clone(&calls_clone);
                async move {
                    *calls.lock().unwrap() += 1;
                    Err(anyhow!("nope"))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_sources() {
        let result: Result<()> = FallbackPolicy::new(Vec::new())
            .run("download", |_| async { Ok(()) })
            .await;
        assert!(result.unwrap_err().to_string().contains("no sources"));
    }
}
