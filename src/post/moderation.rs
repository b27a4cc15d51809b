//! Post lifecycle rules.
//!
//! Every status is reachable from every other one by a moderator; the
//! lifecycle matters because engagement (comments, replies, likes, unlikes)
//! is only legal while a post is approved, and non-approved posts are only
//! visible to their author and to moderators.

use log::info;

use crate::middleware::auth::Actor;
use crate::post::model::{Post, PostStatus};
use crate::utils::error::CustomError;

/// Rejects engagement on posts that are not approved.
pub fn ensure_engageable(status: PostStatus) -> Result<(), CustomError> {
    if status == PostStatus::Approved {
        Ok(())
    } else {
        Err(CustomError::StateError(format!(
            "post is {}; only approved posts accept comments and likes",
            status
        )))
    }
}

pub fn ensure_moderator(actor: &Actor) -> Result<(), CustomError> {
    if actor.is_moderator() {
        Ok(())
    } else {
        Err(CustomError::ForbiddenError(
            "moderator role required".to_string(),
        ))
    }
}

pub fn can_view(post: &Post, actor: &Actor) -> bool {
    post.status == PostStatus::Approved || post.is_authored_by(&actor.id) || actor.is_moderator()
}

/// Moves `post` to the status named by `next`. Returns the previous status.
///
/// The status is left untouched when `next` is not a known status.
pub fn transition(post: &mut Post, moderator: &Actor, next: &str) -> Result<PostStatus, CustomError> {
    ensure_moderator(moderator)?;
    let next: PostStatus = next.parse()?;

    let previous = post.status;
    post.status = next;
    post.touch();

    info!(
        "post {} moved from {} to {} by moderator {}",
        post.id, previous, next, moderator.id
    );
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::Role;
    use crate::post::model::{AuthorRef, CreatePostRequest};

    fn actor(id: &str, role: Role) -> Actor {
        Actor {
            id: id.to_string(),
            name: id.to_string(),
            role,
        }
    }

    fn pending_post() -> Post {
        let author = AuthorRef {
            id: "author".to_string(),
            name: "Author".to_string(),
        };
        let request = CreatePostRequest {
            content: "first".to_string(),
            ..Default::default()
        };
        Post::new(author, request).unwrap()
    }

    #[test]
    fn every_status_reaches_every_status() {
        let moderator = actor("mod", Role::Moderator);
        for from in PostStatus::ALL {
            for to in PostStatus::ALL {
                let mut post = pending_post();
                post.status = from;

                assert_eq!(transition(&mut post, &moderator, to.as_str()), Ok(from));
                assert_eq!(post.status, to);
            }
        }
    }

    #[test]
    fn invalid_status_leaves_post_unchanged() {
        let moderator = actor("mod", Role::Moderator);
        for from in PostStatus::ALL {
            let mut post = pending_post();
            post.status = from;
            let before = post.clone();

            let err = transition(&mut post, &moderator, "archived").unwrap_err();
            assert_eq!(err, CustomError::ValidationError("invalid status".to_string()));
            assert_eq!(post, before);
        }
    }

    #[test]
    fn members_cannot_moderate() {
        let mut post = pending_post();
        let err = transition(&mut post, &actor("author", Role::Member), "approved").unwrap_err();
        assert!(matches!(err, CustomError::ForbiddenError(_)));
        assert_eq!(post.status, PostStatus::Pending);
    }

    #[test]
    fn only_approved_posts_are_engageable() {
        assert!(ensure_engageable(PostStatus::Approved).is_ok());
        for status in [PostStatus::Pending, PostStatus::Disapproved, PostStatus::Removed] {
            assert!(matches!(
                ensure_engageable(status),
                Err(CustomError::StateError(_))
            ));
        }
    }

    #[test]
    fn visibility_of_non_approved_posts() {
        let mut post = pending_post();
        let stranger = actor("stranger", Role::Member);

        assert!(can_view(&post, &actor("author", Role::Member)));
        assert!(can_view(&post, &actor("mod", Role::Moderator)));
        assert!(!can_view(&post, &stranger));

        post.status = PostStatus::Approved;
        assert!(can_view(&post, &stranger));

        post.status = PostStatus::Removed;
        assert!(!can_view(&post, &stranger));
    }
}
