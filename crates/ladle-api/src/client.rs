// Recipe collection HTTP client
//
// Wraps `reqwest::Client` with collection URL construction and
// response decoding. Error responses may carry a `{ message }` body;
// it is surfaced through `Error::Api` so callers can show it verbatim.
// Retry and cancellation policy live in `ladle-core`, not here.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::model::{Deleted, Recipe, Saved};
use crate::transport::TransportConfig;

/// Error body shape the service uses for failed requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Async client for the remote recipe collection.
///
/// Cheaply cloneable. All methods are plain request/response.
#[derive(Debug, Clone)]
pub struct RecipeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RecipeClient {
    /// Create a client from the API base URL
    /// (e.g. `http://127.0.0.1:8005/api`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/recipes`
    fn collection_url(&self) -> Url {
        let full = format!("{}/recipes", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&full).expect("invalid collection URL")
    }

    /// `{base}/recipes/{id}`
    fn recipe_url(&self, id: i64) -> Url {
        let full = format!(
            "{}/recipes/{id}",
            self.base_url.as_str().trim_end_matches('/')
        );
        Url::parse(&full).expect("invalid recipe URL")
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List every recipe in the collection.
    ///
    /// `GET /recipes`
    pub async fn list(&self) -> Result<Vec<Recipe>, Error> {
        let url = self.collection_url();
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// Fetch a single recipe.
    ///
    /// `GET /recipes/{id}`
    pub async fn get(&self, id: i64) -> Result<Recipe, Error> {
        let url = self.recipe_url(id);
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// Create a recipe. The body carries no id.
    ///
    /// `POST /recipes` -> `{ message, ...Recipe }`
    pub async fn create(&self, recipe: &Recipe) -> Result<Saved, Error> {
        let url = self.collection_url();
        debug!("POST {url}");
        let resp = self.http.post(url).json(recipe).send().await?;
        Self::decode(resp).await
    }

    /// Update an existing recipe.
    ///
    /// `PUT /recipes/{id}` -> `{ message, ...Recipe }`
    pub async fn update(&self, id: i64, recipe: &Recipe) -> Result<Saved, Error> {
        let url = self.recipe_url(id);
        debug!("PUT {url}");
        let resp = self.http.put(url).json(recipe).send().await?;
        Self::decode(resp).await
    }

    /// Delete a recipe.
    ///
    /// `DELETE /recipes/{id}` -> `{ message }`
    pub async fn delete(&self, id: i64) -> Result<Deleted, Error> {
        let url = self.recipe_url(id);
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        Self::decode(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Decode a response body, mapping non-success statuses to
    /// `Error::Api` with the body's `{ message }` when present.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
