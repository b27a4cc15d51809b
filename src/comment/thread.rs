//! Comment and reply handling for a single post.
//!
//! Comments live in one flat, insertion-ordered vector per post. Nesting is
//! one level deep: a reply to a reply is attached to the top-level comment
//! it ultimately belongs to.

use chrono::Utc;
use log::debug;
use mongodb::bson::oid::ObjectId;

use crate::comment::model::{Comment, CommentThread, CommentView};
use crate::engagement::ledger::LikerSet;
use crate::post::model::{AuthorRef, Post};
use crate::post::moderation::ensure_engageable;
use crate::utils::error::CustomError;

pub const MAX_COMMENT_CHARS: usize = 500;

fn validate_text(text: &str) -> Result<String, CustomError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CustomError::ValidationError(
            "Comment text cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(CustomError::ValidationError(format!(
            "Comment text cannot exceed {} characters",
            MAX_COMMENT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

fn append(post: &mut Post, author: AuthorRef, text: String, parent_id: Option<ObjectId>) -> Comment {
    let comment = Comment {
        id: ObjectId::new(),
        author,
        text,
        likes: LikerSet::new(),
        parent_id,
        created_at: Utc::now(),
    };
    post.comments.push(comment.clone());
    post.touch();
    comment
}

/// Appends a top-level comment.
pub fn add_comment(post: &mut Post, author: AuthorRef, text: &str) -> Result<Comment, CustomError> {
    ensure_engageable(post.status)?;
    let text = validate_text(text)?;

    let comment = append(post, author, text, None);
    debug!("comment {} added to post {}", comment.id, post.id);
    Ok(comment)
}

/// Appends a reply. Replying to a reply attaches the new comment to the
/// top-level ancestor instead of nesting deeper.
pub fn add_reply(
    post: &mut Post,
    author: AuthorRef,
    parent_comment_id: &ObjectId,
    text: &str,
) -> Result<Comment, CustomError> {
    ensure_engageable(post.status)?;
    let text = validate_text(text)?;

    let parent_id = top_level_ancestor(&post.comments, parent_comment_id)
        .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;

    let reply = append(post, author, text, Some(parent_id));
    debug!(
        "reply {} added under comment {} on post {}",
        reply.id, parent_id, post.id
    );
    Ok(reply)
}

/// Id of the top-level comment `comment_id` belongs to.
///
/// `None` when the comment is unknown or its chain never reaches a real
/// top-level comment (dangling parent or cycle), so new replies only ever
/// point at a comment whose `parent_id` is empty.
fn top_level_ancestor(comments: &[Comment], comment_id: &ObjectId) -> Option<ObjectId> {
    let mut current = comments.iter().find(|c| c.id == *comment_id)?;
    // Bounded walk: stored data is depth one, but a malformed chain must not loop.
    for _ in 0..comments.len() {
        match current.parent_id {
            None => return Some(current.id),
            Some(parent_id) => current = comments.iter().find(|c| c.id == parent_id)?,
        }
    }
    None
}

/// Two-level view of a post's comments for one viewer.
///
/// Built in linear time; iterating it yields each top-level comment with
/// its replies and can be repeated.
pub struct ProjectedComments<'a> {
    comments: &'a [Comment],
    viewer_id: &'a str,
    top_level: Vec<usize>,
    replies: Vec<Vec<usize>>,
}

impl<'a> ProjectedComments<'a> {
    pub fn iter(&self) -> impl Iterator<Item = CommentThread> + '_ {
        self.top_level.iter().map(move |&index| CommentThread {
            comment: CommentView::new(&self.comments[index], self.viewer_id),
            replies: self.replies[index]
                .iter()
                .map(|&reply| CommentView::new(&self.comments[reply], self.viewer_id))
                .collect(),
        })
    }

    /// Number of top-level threads.
    pub fn len(&self) -> usize {
        self.top_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }
}

/// Groups `comments` into top-level threads for `viewer_id`.
///
/// Replies whose parent is itself a reply are placed under the top-level
/// ancestor. Replies whose parent is missing surface as top-level comments.
pub fn project<'a>(comments: &'a [Comment], viewer_id: &'a str) -> ProjectedComments<'a> {
    let anchors = resolve_anchors(comments);

    let mut top_level = Vec::new();
    let mut replies = vec![Vec::new(); comments.len()];
    for (index, &anchor) in anchors.iter().enumerate() {
        if anchor == index {
            top_level.push(index);
        } else {
            replies[anchor].push(index);
        }
    }

    ProjectedComments {
        comments,
        viewer_id,
        top_level,
        replies,
    }
}

/// For each comment, the position of the top-level comment it is shown
/// under (itself when top-level). Each position is resolved once.
fn resolve_anchors(comments: &[Comment]) -> Vec<usize> {
    let positions: std::collections::HashMap<ObjectId, usize> = comments
        .iter()
        .enumerate()
        .map(|(index, comment)| (comment.id, index))
        .collect();

    let mut anchors: Vec<Option<usize>> = vec![None; comments.len()];
    let mut on_path = vec![false; comments.len()];
    let mut path = Vec::new();

    for start in 0..comments.len() {
        let mut current = start;
        let anchor = loop {
            if let Some(anchor) = anchors[current] {
                break anchor;
            }
            let parent = comments[current]
                .parent_id
                .and_then(|id| positions.get(&id).copied());
            match parent {
                Some(parent) if !on_path[parent] && parent != current => {
                    on_path[current] = true;
                    path.push(current);
                    current = parent;
                }
                // Top-level, orphaned, or part of a cycle.
                _ => {
                    anchors[current] = Some(current);
                    break current;
                }
            }
        };
        for index in path.drain(..) {
            on_path[index] = false;
            anchors[index] = Some(anchor);
        }
    }

    anchors
        .into_iter()
        .enumerate()
        .map(|(index, anchor)| anchor.unwrap_or(index))
        .collect()
}
