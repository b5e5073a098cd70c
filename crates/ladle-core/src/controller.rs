// ── Recipe view controller ──
//
// Page-level coordinator: wires user actions through the lifecycle
// manager, stale-response guards, and search debouncer, maintains the
// in-memory collection and its derived filtered view, and forwards
// outcomes to the injected notifier and favorites store.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ladle_api::{Recipe, RecipeClient, TransportConfig};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cancel::with_cancellation;
use crate::config::ControllerConfig;
use crate::debounce::SearchDebouncer;
use crate::error::CoreError;
use crate::favorites::FavoriteStore;
use crate::filter::filter_recipes;
use crate::guard::StaleResponseGuard;
use crate::lifecycle::{LoadingFlags, MutationKind, RequestLifecycleManager};
use crate::notify::Notifier;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. Owns the recipe collection, the
/// favorites set, and every lifecycle primitive; the collaborators
/// (notification sink, favorites store) are injected.
#[derive(Clone)]
pub struct RecipeController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: RecipeClient,
    lifecycle: RequestLifecycleManager,
    detail_guard: StaleResponseGuard<i64>,
    favorite_guard: StaleResponseGuard<i64>,
    search: SearchDebouncer,
    recipes: watch::Sender<Arc<Vec<Recipe>>>,
    detail: watch::Sender<Option<Recipe>>,
    favorites: watch::Sender<HashSet<i64>>,
    favorites_only: AtomicBool,
    loading: Arc<watch::Sender<LoadingFlags>>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn FavoriteStore>,
}

impl RecipeController {
    /// Create a controller. Does NOT touch the network -- call
    /// [`start()`](Self::start) to load favorites and the collection.
    pub fn new(
        config: ControllerConfig,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn FavoriteStore>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = RecipeClient::new(config.base_url.clone(), &transport)?;

        let (loading, _) = watch::channel(LoadingFlags::default());
        let loading = Arc::new(loading);
        let lifecycle = RequestLifecycleManager::new(
            config.retry.clone(),
            Arc::clone(&loading),
            Arc::clone(&notifier),
        );
        let search = SearchDebouncer::new(config.search_quiet);

        let (recipes, _) = watch::channel(Arc::new(Vec::new()));
        let (detail, _) = watch::channel(None);
        let (favorites, _) = watch::channel(HashSet::new());

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                lifecycle,
                detail_guard: StaleResponseGuard::new(),
                favorite_guard: StaleResponseGuard::new(),
                search,
                recipes,
                detail,
                favorites,
                favorites_only: AtomicBool::new(false),
                loading,
                notifier,
                store,
            }),
        })
    }

    // ── Startup ──────────────────────────────────────────────────────

    /// Load persisted favorites (non-fatal on error) and fetch the
    /// collection.
    pub async fn start(&self) -> Result<(), CoreError> {
        match self.inner.store.load() {
            Ok(favorites) => {
                debug!(count = favorites.len(), "loaded persisted favorites");
                self.inner.favorites.send_replace(favorites);
            }
            Err(e) => warn!(error = %e, "failed to load favorites"),
        }
        self.refresh().await
    }

    // ── Reads (no retry, fail immediately) ───────────────────────────

    /// Fetch the whole collection and replace the local copy wholesale.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.set_loading(|flags| flags.list = true);
        let result = self.inner.client.list().await;
        self.set_loading(|flags| flags.list = false);

        match result {
            Ok(recipes) => {
                debug!(count = recipes.len(), "collection refreshed");
                self.inner.recipes.send_replace(Arc::new(recipes));
                Ok(())
            }
            Err(e) => Err(self.notify_error(e.into())),
        }
    }

    /// Fetch one recipe into the detail view.
    ///
    /// Guarded per id: of overlapping fetches for the same recipe, only
    /// the most recently issued one is applied. Stale completions --
    /// results and errors alike -- are dropped silently and resolve to
    /// `Ok(None)`.
    pub async fn detail(&self, id: i64) -> Result<Option<Recipe>, CoreError> {
        let generation = self.inner.detail_guard.begin(id);
        self.set_loading(|flags| flags.detail = true);

        let result = self.inner.client.get(id).await;

        if !self.inner.detail_guard.is_current(&id, generation) {
            // Superseded; the newer fetch owns the busy flag too.
            return Ok(None);
        }
        self.set_loading(|flags| flags.detail = false);

        match result {
            Ok(recipe) => {
                self.inner.detail.send_replace(Some(recipe.clone()));
                Ok(Some(recipe))
            }
            Err(e) => Err(self.notify_error(e.into())),
        }
    }

    // ── Mutations (retry + supersede) ────────────────────────────────

    /// Create a recipe; the settled record is echoed into the
    /// collection.
    pub async fn create(&self, recipe: Recipe) -> Result<Recipe, CoreError> {
        validate(&recipe)?;
        let client = self.inner.client.clone();
        let saved = self
            .inner
            .lifecycle
            .submit(MutationKind::Create, move |token| {
                let client = client.clone();
                let recipe = recipe.clone();
                async move { with_cancellation(&token, client.create(&recipe)).await }
            })
            .await?;

        let created = saved.recipe;
        let echo = created.clone();
        self.inner.recipes.send_modify(move |list| {
            let mut next: Vec<Recipe> = (**list).clone();
            next.push(echo);
            *list = Arc::new(next);
        });
        Ok(created)
    }

    /// Update a recipe; the settled record replaces its collection
    /// entry.
    pub async fn update(&self, id: i64, recipe: Recipe) -> Result<Recipe, CoreError> {
        validate(&recipe)?;
        let client = self.inner.client.clone();
        let saved = self
            .inner
            .lifecycle
            .submit(MutationKind::Update, move |token| {
                let client = client.clone();
                let recipe = recipe.clone();
                async move { with_cancellation(&token, client.update(id, &recipe)).await }
            })
            .await?;

        let updated = saved.recipe;
        let echo = updated.clone();
        self.inner.recipes.send_modify(move |list| {
            let mut next: Vec<Recipe> = (**list).clone();
            if let Some(slot) = next.iter_mut().find(|r| r.id == Some(id)) {
                *slot = echo;
            }
            *list = Arc::new(next);
        });
        Ok(updated)
    }

    /// Delete a recipe; its collection entry is removed.
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        let client = self.inner.client.clone();
        self.inner
            .lifecycle
            .submit(MutationKind::Delete, move |token| {
                let client = client.clone();
                async move { with_cancellation(&token, client.delete(id)).await }
            })
            .await?;

        self.inner.recipes.send_modify(|list| {
            let mut next: Vec<Recipe> = (**list).clone();
            next.retain(|r| r.id != Some(id));
            *list = Arc::new(next);
        });
        Ok(())
    }

    /// Abort the in-flight mutation of `kind`, if any.
    pub fn cancel(&self, kind: MutationKind) {
        self.inner.lifecycle.cancel(kind);
    }

    // ── Favorites ────────────────────────────────────────────────────

    /// Toggle a recipe's favorite status.
    ///
    /// The in-memory set flips immediately; persistence follows after
    /// the settle window, and only for the last-issued toggle per id.
    /// Returns whether the recipe is now a favorite.
    pub fn toggle_favorite(&self, id: i64) -> bool {
        let mut now_favorite = false;
        self.inner.favorites.send_modify(|set| {
            if !set.remove(&id) {
                set.insert(id);
                now_favorite = true;
            }
        });

        let snapshot = self.inner.favorites.borrow().clone();
        let generation = self.inner.favorite_guard.begin(id);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.config.favorite_settle).await;
            if inner.favorite_guard.is_current(&id, generation) {
                if let Err(e) = inner.store.save(&snapshot) {
                    warn!(error = %e, "failed to persist favorites");
                }
            }
        });

        now_favorite
    }

    /// Whether a recipe is currently a favorite.
    pub fn is_favorite(&self, id: i64) -> bool {
        self.inner.favorites.borrow().contains(&id)
    }

    // ── Search & filtering ───────────────────────────────────────────

    /// Record raw search input; the committed query follows after the
    /// quiet period.
    pub fn set_search(&self, raw: impl Into<String>) {
        self.inner.search.input(raw);
    }

    /// Restrict the filtered view to favorites.
    pub fn set_favorites_only(&self, on: bool) {
        self.inner.favorites_only.store(on, Ordering::Relaxed);
    }

    pub fn favorites_only(&self) -> bool {
        self.inner.favorites_only.load(Ordering::Relaxed)
    }

    /// The visible slice of the collection: committed query plus
    /// favorites filter, input order preserved.
    pub fn filtered(&self) -> Vec<Recipe> {
        let recipes = Arc::clone(&*self.inner.recipes.borrow());
        let query = self.inner.search.committed();
        let favorites = self.inner.favorites.borrow();
        filter_recipes(&recipes, &query, self.favorites_only(), &favorites)
    }

    // ── State observation ────────────────────────────────────────────

    pub fn recipes_snapshot(&self) -> Arc<Vec<Recipe>> {
        Arc::clone(&self.inner.recipes.borrow())
    }

    pub fn subscribe_recipes(&self) -> watch::Receiver<Arc<Vec<Recipe>>> {
        self.inner.recipes.subscribe()
    }

    pub fn detail_snapshot(&self) -> Option<Recipe> {
        self.inner.detail.borrow().clone()
    }

    pub fn subscribe_detail(&self) -> watch::Receiver<Option<Recipe>> {
        self.inner.detail.subscribe()
    }

    pub fn favorites_snapshot(&self) -> HashSet<i64> {
        self.inner.favorites.borrow().clone()
    }

    pub fn subscribe_favorites(&self) -> watch::Receiver<HashSet<i64>> {
        self.inner.favorites.subscribe()
    }

    pub fn loading(&self) -> LoadingFlags {
        *self.inner.loading.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<LoadingFlags> {
        self.inner.loading.subscribe()
    }

    pub fn raw_search(&self) -> String {
        self.inner.search.raw()
    }

    pub fn committed_search(&self) -> String {
        self.inner.search.committed()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<String> {
        self.inner.search.subscribe()
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn set_loading(&self, f: impl FnOnce(&mut LoadingFlags)) {
        self.inner.loading.send_modify(f);
    }

    fn notify_error(&self, err: CoreError) -> CoreError {
        self.inner.notifier.error(&err.to_string());
        err
    }
}

/// Client-side check of the data model's one hard constraint: every
/// ingredient needs a non-empty name.
fn validate(recipe: &Recipe) -> Result<(), CoreError> {
    if recipe
        .ingredients
        .iter()
        .any(|ingredient| ingredient.name.trim().is_empty())
    {
        return Err(CoreError::Validation {
            message: "ingredient names must not be empty".into(),
        });
    }
    Ok(())
}
