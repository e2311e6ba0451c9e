//! Store-assigned post identifiers
//!
//! A [`PostId`] is the key SurrealDB generated for a post record, without the
//! table prefix. Its textual form is the whole contract callers rely on:
//!
//! - 1 to [`PostId::MAX_LEN`] characters
//! - every character is an ASCII letter, an ASCII digit or `_`
//!
//! `Display` renders exactly the text `FromStr` accepts, so an id can travel
//! through URLs, logs and other processes and come back unchanged.
//!
//! ```rust
//! use post_store::ids::PostId;
//! use std::str::FromStr;
//!
//! let id = PostId::from_str("k3v9q2m8x1c7b4n6z0wp").unwrap();
//! assert_eq!(id.to_string(), "k3v9q2m8x1c7b4n6z0wp");
//!
//! assert!(PostId::from_str("post:k3v9").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a persisted post.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

impl PostId {
    /// Longest accepted identifier.
    pub const MAX_LEN: usize = 64;

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the identifier into its owned text form.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PostId {
    type Err = PostIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PostIdError::Empty);
        }

        let len = s.chars().count();
        if len > Self::MAX_LEN {
            return Err(PostIdError::TooLong {
                max: Self::MAX_LEN,
                actual: len,
            });
        }

        if let Some((position, character)) = s
            .chars()
            .enumerate()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(PostIdError::InvalidCharacter {
                character,
                position,
            });
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for PostId {
    type Error = PostIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<PostId> for String {
    fn from(id: PostId) -> Self {
        id.0
    }
}

/// Error type for post ID parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostIdError {
    /// The identifier was empty.
    #[error("post ID is empty")]
    Empty,

    /// The identifier exceeded the maximum length.
    #[error("post ID is {actual} characters long, at most {max} allowed")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// The identifier contained a character outside `[A-Za-z0-9_]`.
    #[error("invalid character {character:?} at position {position} in post ID")]
    InvalidCharacter {
        /// Offending character.
        character: char,
        /// Zero-based character position.
        position: usize,
    },
}
