use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::comment::model::CommentThread;
use crate::comment::thread;
use crate::engagement::ledger;
use crate::post::model::{AuthorRef, Post, PostStatus};

/// A post as returned to one viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub id: String,
    pub content: String,
    pub author: AuthorRef,
    pub is_anonymous: bool,
    pub spicy_level: u8,
    pub status: PostStatus,
    pub image_url: Option<String>,
    pub like_count: usize,
    pub comment_count: usize,
    pub is_liked: bool,
    pub comments: Vec<CommentThread>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn project(post: &Post, viewer_id: &str) -> Self {
        let author = if post.is_anonymous {
            AuthorRef::anonymous()
        } else {
            post.author.clone()
        };

        PostView {
            id: post.id.to_hex(),
            content: post.content.clone(),
            author,
            is_anonymous: post.is_anonymous,
            spicy_level: post.spicy_level(),
            status: post.status,
            image_url: post.image_url.clone(),
            like_count: post.likes.len(),
            comment_count: post.comments.len(),
            is_liked: ledger::is_liked_by(&post.likes, viewer_id),
            comments: thread::project(&post.comments, viewer_id).iter().collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::model::CreatePostRequest;

    fn post(content: &str, is_anonymous: bool) -> Post {
        let author = AuthorRef {
            id: "owner".to_string(),
            name: "Owner".to_string(),
        };
        let request = CreatePostRequest {
            content: content.to_string(),
            is_anonymous,
            ..Default::default()
        };
        let mut post = Post::new(author, request).unwrap();
        post.status = PostStatus::Approved;
        post
    }

    #[test]
    fn anonymous_author_is_hidden_from_everyone() {
        let post = post("secret", true);
        for viewer in ["owner", "stranger", "moderator"] {
            let view = PostView::project(&post, viewer);
            assert_eq!(view.author, AuthorRef::anonymous());
        }
    }

    #[test]
    fn attributed_post_keeps_author() {
        let view = PostView::project(&post("hello", false), "stranger");
        assert_eq!(view.author.id, "owner");
        assert!(!view.is_anonymous);
    }

    #[test]
    fn counts_and_viewer_like() {
        let mut post = post("hello", false);
        let status = post.status;
        ledger::like(status, &mut post.likes, "fan").unwrap();
        ledger::like(status, &mut post.likes, "other").unwrap();
        let c1 = thread::add_comment(&mut post, AuthorRef::anonymous(), "c1").unwrap();
        thread::add_reply(&mut post, AuthorRef::anonymous(), &c1.id, "r1").unwrap();

        let view = PostView::project(&post, "fan");
        assert_eq!(view.like_count, 2);
        assert_eq!(view.comment_count, 2);
        assert!(view.is_liked);
        assert_eq!(view.comments.len(), 1);
        assert_eq!(view.comments[0].replies.len(), 1);

        assert!(!PostView::project(&post, "nobody").is_liked);
    }

    #[test]
    fn legacy_rating_is_projected() {
        let mut long = post(&"x".repeat(350), false);
        long.spicy_level = None;
        assert_eq!(PostView::project(&long, "v").spicy_level, 4);

        let mut short = post(&"x".repeat(50), false);
        short.spicy_level = None;
        assert_eq!(PostView::project(&short, "v").spicy_level, 1);
    }
}
