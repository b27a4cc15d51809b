use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::engagement::ledger::{self, LikerSet};
use crate::post::model::AuthorRef;

/// A comment as stored inside its post. Replies point at a top-level
/// comment through `parent_id`; the tree is only built when projecting.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub author: AuthorRef,
    pub text: String,
    #[serde(default)]
    pub likes: LikerSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// A comment rendered for one viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: String,
    pub author: AuthorRef,
    pub text: String,
    pub parent_id: Option<String>,
    pub like_count: usize,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: &Comment, viewer_id: &str) -> Self {
        CommentView {
            id: comment.id.to_hex(),
            author: comment.author.clone(),
            text: comment.text.clone(),
            parent_id: comment.parent_id.map(|id| id.to_hex()),
            like_count: comment.likes.len(),
            is_liked: ledger::is_liked_by(&comment.likes, viewer_id),
            created_at: comment.created_at,
        }
    }
}

/// A top-level comment with its replies in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentView,
    pub replies: Vec<CommentView>,
}
