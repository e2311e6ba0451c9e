//! # post-store
//!
//! Persistence layer for blog posts backed by SurrealDB.
//!
//! ## Components
//!
//! - **Connection**: [`ConnectionConfig`](connection::ConnectionConfig) builds the
//!   connection URI, opens a session within a bounded timeout and verifies it with
//!   a liveness round trip
//! - **Repository**: [`SurrealPostRepository`](repository::SurrealPostRepository)
//!   creates, fetches, lists and deletes posts in one collection
//! - **Configuration**: layered figment configuration ([`config::Config`])
//! - **Observability**: JSON tracing output ([`observability::init_tracing`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use post_store::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config.log);
//!
//!     let handle = config.store.configurator().connect().await?;
//!     let repo = SurrealPostRepository::new(handle, "blog", "posts");
//!
//!     repo.ensure_collection_exists().await?;
//!     let id = repo.create_post(&Post::new("Hello", "World")).await?;
//!
//!     if let Some(post) = repo.get_post(id.as_str()).await? {
//!         println!("{}: {}", post.title, post.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod ids;
pub mod models;
pub mod observability;
pub mod repository;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, LogConfig, RepositoryConfig, StoreConfig};
    pub use crate::connection::{ConnectionConfig, ConnectionHandle, SurrealClient, DEFAULT_TIMEOUT};
    pub use crate::error::{Error, Result, StoreError, StoreErrorKind, StoreOperation};
    pub use crate::ids::{PostId, PostIdError};
    pub use crate::models::{DeleteResult, Post};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{PostRepository, SurrealPostRepository};
}
