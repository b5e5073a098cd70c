// ── Controller configuration ──
//
// Where the recipe service lives and how the lifecycle layer paces
// itself. The embedding constructs one and hands it in -- core never
// reads config files.

use std::time::Duration;

use url::Url;

use crate::retry::RetryPolicy;

/// Configuration for a [`RecipeController`](crate::controller::RecipeController).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// API base URL (e.g. `http://127.0.0.1:8005/api`).
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Backoff budget for create/update/delete. Reads are never retried.
    pub retry: RetryPolicy,
    /// Quiet period before a raw search input is committed.
    pub search_quiet: Duration,
    /// Settle window before a favorite toggle is persisted.
    pub favorite_settle: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8005/api"
                .parse()
                .expect("default base URL"),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            search_quiet: Duration::from_millis(500),
            favorite_settle: Duration::from_millis(500),
        }
    }
}
