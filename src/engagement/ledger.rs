//! Like/unlike bookkeeping shared by posts and comments.
//!
//! Both targets own a [`LikerSet`]; the same three operations apply to
//! either one. A repeated like (or an unlike without a like) is rejected
//! with a conflict rather than silently ignored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::post::model::PostStatus;
use crate::post::moderation::ensure_engageable;
use crate::utils::error::CustomError;

/// The set of actor ids that liked a post or a comment.
///
/// Stored as a plain array; duplicates in a legacy document collapse on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikerSet(HashSet<String>);

impl LikerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, actor_id: &str) -> bool {
        self.0.contains(actor_id)
    }
}

impl<S: Into<String>> FromIterator<S> for LikerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        LikerSet(iter.into_iter().map(Into::into).collect())
    }
}

/// Adds `actor_id` to `likers` and returns the new like count.
pub fn like(status: PostStatus, likers: &mut LikerSet, actor_id: &str) -> Result<usize, CustomError> {
    ensure_engageable(status)?;

    if likers.contains(actor_id) {
        return Err(CustomError::ConflictError("already liked".to_string()));
    }

    likers.0.insert(actor_id.to_string());
    Ok(likers.len())
}

/// Removes `actor_id` from `likers` and returns the new like count.
pub fn unlike(
    status: PostStatus,
    likers: &mut LikerSet,
    actor_id: &str,
) -> Result<usize, CustomError> {
    ensure_engageable(status)?;

    if !likers.0.remove(actor_id) {
        return Err(CustomError::ConflictError("not liked yet".to_string()));
    }

    Ok(likers.len())
}

pub fn is_liked_by(likers: &LikerSet, actor_id: &str) -> bool {
    likers.contains(actor_id)
}
