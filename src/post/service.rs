use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, warn};
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;

use crate::comment::model::{Comment, CommentView};
use crate::comment::thread;
use crate::database::PostRepository;
use crate::engagement::ledger;
use crate::middleware::auth::Actor;
use crate::post::model::{CreatePostRequest, Post, PostStatus};
use crate::post::moderation;
use crate::post::view::PostView;
use crate::utils::error::CustomError;
use crate::utils::pagination::{Page, PageRequest};

/// Commands and queries against post aggregates.
///
/// Mutations on one post are serialised through a per-post lock held for
/// the whole load, change, save sequence; posts never share a lock.
pub struct PostService {
    repository: Arc<dyn PostRepository>,
    locks: DashMap<ObjectId, Arc<Mutex<()>>>,
}

impl PostService {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        PostService {
            repository,
            locks: DashMap::new(),
        }
    }

    async fn load(&self, id: &ObjectId) -> Result<Post, CustomError> {
        let mut post = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Post not found".to_string()))?;
        post.normalize_legacy();
        Ok(post)
    }

    /// Runs `change` against the stored post and saves the result. Nothing is
    /// written when `change` fails.
    async fn mutate<T>(
        &self,
        id: &ObjectId,
        change: impl FnOnce(&mut Post) -> Result<T, CustomError>,
    ) -> Result<(Post, T), CustomError> {
        let lock = self.locks.entry(*id).or_default().clone();
        let result = {
            let _guard = lock.lock().await;
            self.apply(id, change).await
        };

        drop(lock);
        self.locks.remove_if(id, |_, lock| Arc::strong_count(lock) == 1);

        if let Err(err) = &result {
            warn!("rejected change to post {}: {}", id, err);
        }
        result
    }

    async fn apply<T>(
        &self,
        id: &ObjectId,
        change: impl FnOnce(&mut Post) -> Result<T, CustomError>,
    ) -> Result<(Post, T), CustomError> {
        let mut post = self.load(id).await?;
        let output = change(&mut post)?;
        self.repository.save(&post).await?;
        Ok((post, output))
    }

    pub async fn create_post(
        &self,
        actor: &Actor,
        request: CreatePostRequest,
    ) -> Result<PostView, CustomError> {
        let post = Post::new(actor.author_ref(), request)?;
        self.repository.save(&post).await?;

        debug!("post {} created by {}", post.id, actor.id);
        Ok(PostView::project(&post, &actor.id))
    }

    /// Approved posts are visible to everyone; others only to their author
    /// and moderators. Hidden posts are reported as missing.
    pub async fn view_post(&self, id: &ObjectId, actor: &Actor) -> Result<PostView, CustomError> {
        let post = self.load(id).await?;
        if !moderation::can_view(&post, actor) {
            return Err(CustomError::NotFoundError("Post not found".to_string()));
        }
        Ok(PostView::project(&post, &actor.id))
    }

    pub async fn update_status(
        &self,
        id: &ObjectId,
        actor: &Actor,
        status: &str,
    ) -> Result<PostView, CustomError> {
        moderation::ensure_moderator(actor)?;
        let (post, _) = self
            .mutate(id, |post| moderation::transition(post, actor, status))
            .await?;
        Ok(PostView::project(&post, &actor.id))
    }

    pub async fn like_post(&self, id: &ObjectId, actor: &Actor) -> Result<usize, CustomError> {
        let (_, count) = self
            .mutate(id, |post| {
                let count = ledger::like(post.status, &mut post.likes, &actor.id)?;
                post.touch();
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    pub async fn unlike_post(&self, id: &ObjectId, actor: &Actor) -> Result<usize, CustomError> {
        let (_, count) = self
            .mutate(id, |post| {
                let count = ledger::unlike(post.status, &mut post.likes, &actor.id)?;
                post.touch();
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    pub async fn add_comment(
        &self,
        id: &ObjectId,
        actor: &Actor,
        text: &str,
    ) -> Result<CommentView, CustomError> {
        let (_, comment) = self
            .mutate(id, |post| thread::add_comment(post, actor.author_ref(), text))
            .await?;
        Ok(CommentView::new(&comment, &actor.id))
    }

    pub async fn add_reply(
        &self,
        id: &ObjectId,
        parent_comment_id: &ObjectId,
        actor: &Actor,
        text: &str,
    ) -> Result<CommentView, CustomError> {
        let (_, reply) = self
            .mutate(id, |post| {
                thread::add_reply(post, actor.author_ref(), parent_comment_id, text)
            })
            .await?;
        Ok(CommentView::new(&reply, &actor.id))
    }

    pub async fn like_comment(
        &self,
        id: &ObjectId,
        comment_id: &ObjectId,
        actor: &Actor,
    ) -> Result<usize, CustomError> {
        let (_, count) = self
            .mutate(id, |post| {
                let status = post.status;
                moderation::ensure_engageable(status)?;
                let comment = find_comment(post, comment_id)?;
                let count = ledger::like(status, &mut comment.likes, &actor.id)?;
                post.touch();
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    pub async fn unlike_comment(
        &self,
        id: &ObjectId,
        comment_id: &ObjectId,
        actor: &Actor,
    ) -> Result<usize, CustomError> {
        let (_, count) = self
            .mutate(id, |post| {
                let status = post.status;
                moderation::ensure_engageable(status)?;
                let comment = find_comment(post, comment_id)?;
                let count = ledger::unlike(status, &mut comment.likes, &actor.id)?;
                post.touch();
                Ok(count)
            })
            .await?;
        Ok(count)
    }

    /// The public feed.
    pub async fn list_approved(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Page<PostView>, CustomError> {
        let posts = self
            .repository
            .find_by_status(PostStatus::Approved, page)
            .await?;
        Ok(project_page(posts, actor))
    }

    /// Moderation queue for any status.
    pub async fn list_by_status(
        &self,
        actor: &Actor,
        status: &str,
        page: PageRequest,
    ) -> Result<Page<PostView>, CustomError> {
        moderation::ensure_moderator(actor)?;
        let status: PostStatus = status.parse()?;
        let posts = self.repository.find_by_status(status, page).await?;
        Ok(project_page(posts, actor))
    }

    /// The caller's own posts in every status.
    pub async fn list_mine(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Page<PostView>, CustomError> {
        let posts = self.repository.find_by_author(&actor.id, page).await?;
        Ok(project_page(posts, actor))
    }
}

fn find_comment<'a>(
    post: &'a mut Post,
    comment_id: &ObjectId,
) -> Result<&'a mut Comment, CustomError> {
    post.comments
        .iter_mut()
        .find(|comment| comment.id == *comment_id)
        .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))
}

fn project_page(posts: Page<Post>, actor: &Actor) -> Page<PostView> {
    posts.map(|mut post| {
        post.normalize_legacy();
        PostView::project(&post, &actor.id)
    })
}
