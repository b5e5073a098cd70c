// ladle-core: Request lifecycle and concurrency control between
// ladle-api and a presentation layer.

pub mod cancel;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod guard;
pub mod lifecycle;
pub mod notify;
pub mod retry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cancel::with_cancellation;
pub use config::ControllerConfig;
pub use controller::RecipeController;
pub use debounce::SearchDebouncer;
pub use error::CoreError;
pub use favorites::{FAVORITES_KEY, FavoriteStore, JsonFileStore, MemoryStore, StoreError};
pub use filter::filter_recipes;
pub use guard::StaleResponseGuard;
pub use lifecycle::{LoadingFlags, MutationKind, RequestLifecycleManager};
pub use notify::{NotificationKind, Notifier, TracingNotifier};
pub use retry::{RetryPolicy, with_retry};

// Re-export the API models consumers handle directly.
pub use ladle_api::{Acknowledged, Ingredient, Recipe};
