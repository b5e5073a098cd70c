// ── Domain models for the recipe collection ──
//
// Mutation responses arrive as a `{ message, ... }` envelope: the
// service's acknowledgement message plus, for create/update, the
// settled recipe flattened alongside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recipe ingredient.
///
/// `name` is the only required field; the service rejects empty names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A recipe as stored by the remote collection.
///
/// `id` is assigned by the service and absent before creation;
/// `updated_at` is service-maintained. Both are omitted from request
/// bodies when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A service acknowledgement carrying a user-facing message.
pub trait Acknowledged {
    /// The service-supplied success message.
    fn message(&self) -> &str;
}

/// Response to a create or update: acknowledgement plus the settled recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct Saved {
    pub message: String,
    #[serde(flatten)]
    pub recipe: Recipe,
}

/// Response to a delete: acknowledgement only.
#[derive(Debug, Clone, Deserialize)]
pub struct Deleted {
    pub message: String,
}

impl Acknowledged for Saved {
    fn message(&self) -> &str {
        &self.message
    }
}

impl Acknowledged for Deleted {
    fn message(&self) -> &str {
        &self.message
    }
}
