// ladle-api: Async Rust client for the remote recipe collection

pub mod client;
pub mod error;
pub mod model;
pub mod transport;

pub use client::RecipeClient;
pub use error::Error;
pub use model::{Acknowledged, Deleted, Ingredient, Recipe, Saved};
pub use transport::TransportConfig;
