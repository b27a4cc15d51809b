use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::comment::model::Comment;
use crate::engagement::ledger::LikerSet;
use crate::utils::error::CustomError;

pub const MAX_CONTENT_CHARS: usize = 1000;
pub const MIN_SPICY_LEVEL: u8 = 1;
pub const MAX_SPICY_LEVEL: u8 = 5;

pub const ANONYMOUS_AUTHOR_ID: &str = "anonymous";
pub const ANONYMOUS_AUTHOR_NAME: &str = "Anonymous";

/// Moderation status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Pending,
    Approved,
    Disapproved,
    Removed,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Pending,
        PostStatus::Approved,
        PostStatus::Disapproved,
        PostStatus::Removed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Pending => "pending",
            PostStatus::Approved => "approved",
            PostStatus::Disapproved => "disapproved",
            PostStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| CustomError::ValidationError("invalid status".to_string()))
    }
}

/// Who wrote a post or a comment, as resolved by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    pub name: String,
}

impl AuthorRef {
    pub fn anonymous() -> Self {
        AuthorRef {
            id: ANONYMOUS_AUTHOR_ID.to_string(),
            name: ANONYMOUS_AUTHOR_NAME.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub author: AuthorRef,
    #[serde(default)]
    pub is_anonymous: bool,
    /// `None` only for records written before the rating existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spicy_level: Option<u8>,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub likes: LikerSet,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Stored as a BSON date so the feed sorts chronologically.
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
    pub spicy_level: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl Post {
    /// Builds a new pending post, validating and normalising the request.
    pub fn new(author: AuthorRef, request: CreatePostRequest) -> Result<Self, CustomError> {
        let content = validate_content(&request.content)?;
        let image_url = request
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let now = Utc::now();

        Ok(Post {
            id: ObjectId::new(),
            content,
            author,
            is_anonymous: request.is_anonymous,
            spicy_level: Some(clamp_spicy_level(request.spicy_level)),
            status: PostStatus::Pending,
            image_url,
            likes: LikerSet::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// The declared rating, or the length-derived one for legacy records.
    pub fn spicy_level(&self) -> u8 {
        self.spicy_level
            .unwrap_or_else(|| legacy_spicy_level(&self.content))
    }

    /// Fills in fields missing from legacy records. Applied on every load.
    pub fn normalize_legacy(&mut self) {
        if self.spicy_level.is_none() {
            self.spicy_level = Some(legacy_spicy_level(&self.content));
        }
    }

    pub fn is_authored_by(&self, actor_id: &str) -> bool {
        self.author.id == actor_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn validate_content(content: &str) -> Result<String, CustomError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CustomError::ValidationError(
            "Post content cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(CustomError::ValidationError(format!(
            "Post content cannot exceed {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

pub fn clamp_spicy_level(level: Option<i64>) -> u8 {
    level
        .unwrap_or(MIN_SPICY_LEVEL as i64)
        .clamp(MIN_SPICY_LEVEL as i64, MAX_SPICY_LEVEL as i64) as u8
}

/// Rating backfill for posts stored before `spicy_level` existed.
pub fn legacy_spicy_level(content: &str) -> u8 {
    match content.chars().count() {
        len if len > 400 => 5,
        len if len > 300 => 4,
        len if len > 200 => 3,
        len if len > 100 => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> AuthorRef {
        AuthorRef {
            id: "u1".to_string(),
            name: "Ada".to_string(),
        }
    }

    fn request(content: &str) -> CreatePostRequest {
        CreatePostRequest {
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn new_post_is_pending_and_trimmed() {
        let post = Post::new(author(), request("  hello  ")).unwrap();
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.content, "hello");
        assert_eq!(post.spicy_level, Some(1));
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn content_bounds_are_enforced() {
        assert!(matches!(
            Post::new(author(), request("   ")),
            Err(CustomError::ValidationError(_))
        ));
        assert!(Post::new(author(), request(&"a".repeat(1000))).is_ok());
        assert!(matches!(
            Post::new(author(), request(&"a".repeat(1001))),
            Err(CustomError::ValidationError(_))
        ));
    }

    #[test]
    fn spicy_level_is_clamped_on_write() {
        assert_eq!(clamp_spicy_level(Some(9)), 5);
        assert_eq!(clamp_spicy_level(Some(-3)), 1);
        assert_eq!(clamp_spicy_level(Some(3)), 3);
        assert_eq!(clamp_spicy_level(None), 1);
    }

    #[test]
    fn legacy_breakpoints() {
        assert_eq!(legacy_spicy_level(&"x".repeat(401)), 5);
        assert_eq!(legacy_spicy_level(&"x".repeat(400)), 4);
        assert_eq!(legacy_spicy_level(&"x".repeat(350)), 4);
        assert_eq!(legacy_spicy_level(&"x".repeat(201)), 3);
        assert_eq!(legacy_spicy_level(&"x".repeat(101)), 2);
        assert_eq!(legacy_spicy_level(&"x".repeat(100)), 1);
        assert_eq!(legacy_spicy_level(&"x".repeat(50)), 1);
    }

    #[test]
    fn legacy_record_without_rating_is_backfilled() {
        let stored = mongodb::bson::doc! {
            "_id": ObjectId::new(),
            "content": "x".repeat(350),
            "author": { "id": "u1", "name": "Ada" },
            "status": "approved",
            "created_at": mongodb::bson::DateTime::from_millis(1_704_067_200_000),
            "updated_at": mongodb::bson::DateTime::from_millis(1_704_067_200_000),
        };
        let mut post: Post = mongodb::bson::from_document(stored).unwrap();

        assert_eq!(post.spicy_level, None);
        assert_eq!(post.spicy_level(), 4);
        post.normalize_legacy();
        assert_eq!(post.spicy_level, Some(4));
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
        assert_eq!(post.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn timestamps_are_stored_as_bson_dates() {
        let mut post = Post::new(author(), request("hello")).unwrap();
        post.status = PostStatus::Approved;
        crate::comment::thread::add_comment(&mut post, author(), "hi").unwrap();

        let stored = mongodb::bson::to_document(&post).unwrap();
        assert!(stored.get_datetime("created_at").is_ok());
        assert!(stored.get_datetime("updated_at").is_ok());
        let comment = stored.get_array("comments").unwrap()[0].as_document().unwrap();
        assert!(comment.get_datetime("created_at").is_ok());

        let loaded: Post = mongodb::bson::from_document(stored).unwrap();
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            post.created_at.timestamp_millis()
        );
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert_eq!("approved".parse::<PostStatus>(), Ok(PostStatus::Approved));
        assert_eq!(
            "archived".parse::<PostStatus>(),
            Err(CustomError::ValidationError("invalid status".to_string()))
        );
    }
}
