//! SurrealDB post repository
//!
//! Posts live in one table per collection. Each query is prefixed with a
//! `USE DB` statement so a repository always talks to its own database even
//! when several repositories share one connection.

use std::time::Duration;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::traits::PostRepository;
use crate::connection::{bounded, ConnectionHandle};
use crate::error::{Error, Result, StoreError, StoreOperation};
use crate::ids::PostId;
use crate::models::{DeleteResult, Post};

/// Title of the record `ensure_collection_exists` writes and removes
pub const PLACEHOLDER_TITLE: &str = "Temp Title";

/// Content of the record `ensure_collection_exists` writes and removes
pub const PLACEHOLDER_CONTENT: &str = "Temp Content";

const INSERT_POST: &str = "CREATE type::table($table) CONTENT $data RETURN VALUE record::id(id)";
const INSERT_PLACEHOLDER: &str = "CREATE type::table($table) CONTENT $data RETURN NONE";
const DELETE_BY_TITLE: &str = "DELETE type::table($table) WHERE title = $title RETURN NONE";
const SELECT_ONE: &str =
    "SELECT record::id(id) AS id, title, content FROM type::thing($table, $id)";
// Rows whose fields are not all strings cannot become a `Post`; they are
// filtered out in the store so one odd record never fails the whole scan.
const SELECT_ALL: &str = "SELECT record::id(id) AS id, title, content FROM type::table($table) \
     WHERE type::is::string(record::id(id)) AND type::is::string(title) AND type::is::string(content); \
     SELECT count() AS total FROM type::table($table) GROUP ALL";
const DELETE_ONE: &str = "DELETE type::thing($table, $id) RETURN BEFORE";

/// Serializable record for SurrealDB insert
#[derive(Serialize)]
struct PostRecord {
    title: String,
    content: String,
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
        }
    }
}

/// Deserializable record from SurrealDB queries
#[derive(Deserialize)]
struct PostRow {
    id: String,
    title: String,
    content: String,
}

impl TryFrom<PostRow> for Post {
    type Error = StoreError;

    fn try_from(row: PostRow) -> std::result::Result<Self, Self::Error> {
        let id = row.id.parse::<PostId>().map_err(|e| {
            StoreError::decode(StoreOperation::Find, format!("stored key '{}': {}", row.id, e))
        })?;

        Ok(Post {
            id: Some(id),
            title: row.title,
            content: row.content,
        })
    }
}

/// Record count returned by a `GROUP ALL` aggregate
#[derive(Deserialize)]
struct CountRow {
    total: u64,
}

/// Post repository backed by a SurrealDB table
#[derive(Debug, Clone)]
pub struct SurrealPostRepository {
    handle: ConnectionHandle,
    database: String,
    collection: String,
    timeout: Duration,
}

impl SurrealPostRepository {
    /// Create a repository for `collection` inside `database`.
    ///
    /// Nothing is verified here; the collection is resolved on first use.
    pub fn new(
        handle: ConnectionHandle,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        let timeout = handle.timeout();
        Self {
            handle,
            database: database.into(),
            collection: collection.into(),
            timeout,
        }
    }

    /// Override the per-operation bound inherited from the handle
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shared connection handle
    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    /// Database every query selects first
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Collection (table) holding the posts
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Bound applied to each operation
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn statement(&self, body: &str) -> String {
        format!("USE DB {}; {}", escape_ident(&self.database), body)
    }

    fn store_error(&self, operation: StoreOperation, err: &surrealdb::Error) -> Error {
        let error = StoreError::from_driver(operation, err)
            .with_context(format!("collection {}", self.collection));
        error!(
            %operation,
            kind = %error.kind,
            collection = %self.collection,
            "Store error: {}",
            error.message
        );
        Error::Store(error)
    }

    fn parse_id(&self, id: &str) -> Result<PostId> {
        id.parse::<PostId>().map_err(|e| {
            warn!(collection = %self.collection, post_id = %id, "Invalid ID format: {}", e);
            Error::InvalidIdentifier(e)
        })
    }

    async fn insert_placeholder(&self) -> Result<()> {
        let placeholder = PostRecord {
            title: PLACEHOLDER_TITLE.to_string(),
            content: PLACEHOLDER_CONTENT.to_string(),
        };

        self.handle
            .client()
            .query(self.statement(INSERT_PLACEHOLDER))
            .bind(("table", self.collection.clone()))
            .bind(("data", placeholder))
            .await
            .and_then(|response| response.check())
            .map_err(|e| self.ensure_error(StoreOperation::Insert, &e))?;

        Ok(())
    }

    async fn delete_placeholders(&self) -> Result<()> {
        self.handle
            .client()
            .query(self.statement(DELETE_BY_TITLE))
            .bind(("table", self.collection.clone()))
            .bind(("title", PLACEHOLDER_TITLE))
            .await
            .and_then(|response| response.check())
            .map_err(|e| self.ensure_error(StoreOperation::Delete, &e))?;

        Ok(())
    }

    fn ensure_error(&self, operation: StoreOperation, err: &surrealdb::Error) -> Error {
        match self.store_error(operation, err) {
            Error::Store(e) => Error::Store(e.with_context(format!(
                "ensure_collection_exists on collection {}",
                self.collection
            ))),
            other => other,
        }
    }

    async fn insert(&self, record: PostRecord) -> Result<PostId> {
        let mut response = self
            .handle
            .client()
            .query(self.statement(INSERT_POST))
            .bind(("table", self.collection.clone()))
            .bind(("data", record))
            .await
            .map_err(|e| self.store_error(StoreOperation::Insert, &e))?;

        let keys: Vec<String> = response
            .take(last_statement(&response))
            .map_err(|e| self.store_error(StoreOperation::Insert, &e))?;

        let key = keys.into_iter().next().ok_or_else(|| {
            Error::Store(StoreError::decode(
                StoreOperation::Insert,
                "store returned no identifier for the created post",
            ))
        })?;

        key.parse::<PostId>().map_err(|e| {
            Error::Store(StoreError::decode(
                StoreOperation::Insert,
                format!("store assigned key '{}': {}", key, e),
            ))
        })
    }

    async fn find_one(&self, id: PostId) -> Result<Option<Post>> {
        let mut response = self
            .handle
            .client()
            .query(self.statement(SELECT_ONE))
            .bind(("table", self.collection.clone()))
            .bind(("id", id.into_inner()))
            .await
            .map_err(|e| self.store_error(StoreOperation::Find, &e))?;

        let rows: Vec<PostRow> = response
            .take(last_statement(&response))
            .map_err(|e| self.store_error(StoreOperation::Find, &e))?;

        match rows.into_iter().next() {
            Some(row) => Post::try_from(row).map(Some).map_err(Error::Store),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Post>> {
        let mut response = self
            .handle
            .client()
            .query(self.statement(SELECT_ALL))
            .bind(("table", self.collection.clone()))
            .await
            .map_err(|e| self.store_error(StoreOperation::Find, &e))?;

        let count_index = last_statement(&response);
        let rows: Vec<PostRow> = response
            .take(count_index.saturating_sub(1))
            .map_err(|e| self.store_error(StoreOperation::Find, &e))?;
        let counts: Vec<CountRow> = response
            .take(count_index)
            .map_err(|e| self.store_error(StoreOperation::Find, &e))?;
        let total: u64 = counts.iter().map(|c| c.total).sum();

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            match Post::try_from(row) {
                Ok(post) => posts.push(post),
                Err(e) => warn!(
                    collection = %self.collection,
                    "Error decoding post, skipping: {}",
                    e.message
                ),
            }
        }

        let skipped = total.saturating_sub(posts.len() as u64);
        if skipped > 0 {
            warn!(
                collection = %self.collection,
                skipped,
                "Skipped records that do not decode as posts"
            );
        }

        Ok(posts)
    }

    async fn delete_one(&self, id: PostId) -> Result<DeleteResult> {
        let mut response = self
            .handle
            .client()
            .query(self.statement(DELETE_ONE))
            .bind(("table", self.collection.clone()))
            .bind(("id", id.into_inner()))
            .await
            .map_err(|e| self.store_error(StoreOperation::Delete, &e))?;

        let removed: Vec<IgnoredAny> = response
            .take(last_statement(&response))
            .map_err(|e| self.store_error(StoreOperation::Delete, &e))?;

        Ok(DeleteResult {
            deleted_count: removed.len() as u64,
        })
    }
}

impl PostRepository for SurrealPostRepository {
    async fn ensure_collection_exists(&self) -> Result<()> {
        bounded(StoreOperation::Insert, self.timeout, self.insert_placeholder()).await?;
        bounded(StoreOperation::Delete, self.timeout, self.delete_placeholders()).await?;

        debug!(collection = %self.collection, "Collection ensured");
        Ok(())
    }

    async fn create_post(&self, post: &Post) -> Result<PostId> {
        let id = bounded(
            StoreOperation::Insert,
            self.timeout,
            self.insert(PostRecord::from(post)),
        )
        .await?;

        info!(collection = %self.collection, post_id = %id, "Post created");
        Ok(id)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        let id = self.parse_id(id)?;
        let post = bounded(StoreOperation::Find, self.timeout, self.find_one(id.clone())).await?;

        if post.is_none() {
            warn!(collection = %self.collection, post_id = %id, "No document found with that ID");
        }
        Ok(post)
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>> {
        let posts = bounded(StoreOperation::Find, self.timeout, self.find_all()).await?;

        debug!(collection = %self.collection, count = posts.len(), "Posts listed");
        Ok(posts)
    }

    async fn delete_post(&self, id: &str) -> Result<DeleteResult> {
        let id = self.parse_id(id)?;
        let result = bounded(StoreOperation::Delete, self.timeout, self.delete_one(id.clone())).await?;

        info!(
            collection = %self.collection,
            post_id = %id,
            deleted = result.deleted_count,
            "Post delete finished"
        );
        Ok(result)
    }
}

/// Index of the statement carrying the result; the `USE` prefix comes first
fn last_statement(response: &surrealdb::Response) -> usize {
    response.num_statements().saturating_sub(1)
}

/// Quote an identifier for use in a SurrealQL statement
fn escape_ident(name: &str) -> String {
    format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
}
