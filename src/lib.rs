// Library root for the blog post retrieval function

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod query;
pub mod secrets;

// Re-export commonly used types
pub use config::Config;
pub use db::{PgConnector, PostConnection, PostConnector};
pub use error::ApiError;
pub use handlers::BlogPostsHandler;
pub use models::{ApiResponse, BlogPost, SearchRequest};
pub use secrets::{SecretStore, SecretsManagerStore};
