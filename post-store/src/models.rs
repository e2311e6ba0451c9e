//! Post entity and operation results

use serde::{Deserialize, Serialize};

use crate::ids::PostId;

/// A blog post.
///
/// `id` is `None` until the store has persisted the post. The repository
/// ignores any id on the way in and never changes one on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,

    /// Post title
    pub title: String,

    /// Post body
    pub content: String,
}

impl Post {
    /// Create an unsaved post
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Whether the store has assigned an identifier
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    /// Number of records removed (zero when nothing matched)
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_is_unsaved() {
        let post = Post::new("Hello", "World");
        assert!(!post.is_persisted());
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
    }

    #[test]
    fn test_unsaved_post_serializes_without_id() {
        let json = serde_json::to_value(Post::new("t", "c")).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "t", "content": "c" }));
    }

    #[test]
    fn test_delete_result_default_is_zero() {
        assert_eq!(DeleteResult::default().deleted_count, 0);
    }
}
