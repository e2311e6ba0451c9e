//! Post repository
//!
//! [`PostRepository`] is the backend-neutral interface; [`SurrealPostRepository`]
//! implements it on top of a [`ConnectionHandle`](crate::connection::ConnectionHandle).
//!
//! # Example
//!
//! ```rust,no_run
//! use post_store::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let handle = ConnectionConfig::new("root", "root", "blog", "localhost", "8000")
//!     .connect()
//!     .await?;
//! let repo = SurrealPostRepository::new(handle, "blog", "posts");
//! repo.ensure_collection_exists().await?;
//!
//! let id = repo.create_post(&Post::new("Hello", "World")).await?;
//! let post = repo.get_post(id.as_str()).await?;
//! assert_eq!(post.map(|p| p.title), Some("Hello".to_string()));
//!
//! let deleted = repo.delete_post(id.as_str()).await?;
//! assert_eq!(deleted.deleted_count, 1);
//! # Ok(())
//! # }
//! ```

mod surreal;
mod traits;

pub use surreal::{SurrealPostRepository, PLACEHOLDER_CONTENT, PLACEHOLDER_TITLE};
pub use traits::PostRepository;
