//! Repository trait definition
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! write plain `async fn` without `async_trait`.

use std::future::Future;

use crate::error::Result;
use crate::ids::PostId;
use crate::models::{DeleteResult, Post};

/// Persistence operations for posts.
///
/// Every call is a single round trip to the store, bounded by a timeout.
/// Identifiers are accepted as text and parsed with [`PostId`]'s contract, so
/// a lookup has three outcomes:
///
/// | input | result |
/// |---|---|
/// | malformed id | `Err(Error::InvalidIdentifier(_))` |
/// | well-formed, no record | `Ok(None)` |
/// | well-formed, record exists | `Ok(Some(post))` |
///
/// [`Error::InvalidIdentifier`]: crate::error::Error::InvalidIdentifier
pub trait PostRepository: Send + Sync {
    /// Make sure the backing collection exists.
    ///
    /// Inserts a placeholder post and then deletes every post carrying the
    /// placeholder title. The two steps are not atomic, so concurrent readers
    /// may briefly see the placeholder.
    fn ensure_collection_exists(&self) -> impl Future<Output = Result<()>> + Send;

    /// Insert a post and return the identifier the store assigned.
    ///
    /// Any `id` already set on `post` is ignored.
    fn create_post(&self, post: &Post) -> impl Future<Output = Result<PostId>> + Send;

    /// Fetch a single post.
    fn get_post(&self, id: &str) -> impl Future<Output = Result<Option<Post>>> + Send;

    /// Fetch every post in the collection.
    ///
    /// Records that cannot be decoded as posts are logged and skipped. A
    /// failure of the scan itself fails the whole call.
    fn get_all_posts(&self) -> impl Future<Output = Result<Vec<Post>>> + Send;

    /// Delete a post. Deleting an id with no record reports zero deleted.
    fn delete_post(&self, id: &str) -> impl Future<Output = Result<DeleteResult>> + Send;
}
