pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod shape;
pub mod state;
pub mod types;

pub use api::ApiClient;
pub use config::Config;
pub use error::{DrugPathError, Result};
pub use state::{reduce, Action, AppState, Store};
