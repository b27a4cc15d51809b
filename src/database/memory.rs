use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::repository::PostRepository;
use crate::post::model::{Post, PostStatus};
use crate::utils::error::CustomError;
use crate::utils::pagination::{Page, PageRequest};

/// Process-local post store for development and tests.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<ObjectId, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn page_where(&self, page: PageRequest, keep: impl Fn(&Post) -> bool) -> Page<Post> {
        let posts = self.posts.read().await;
        let mut matching: Vec<&Post> = posts.values().filter(|post| keep(post)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.skip()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .cloned()
            .collect();

        Page {
            items,
            current_page: page.page,
            total_pages: page.total_pages(total),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn save(&self, post: &Post) -> Result<(), CustomError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_by_status(
        &self,
        status: PostStatus,
        page: PageRequest,
    ) -> Result<Page<Post>, CustomError> {
        Ok(self.page_where(page, |post| post.status == status).await)
    }

    async fn find_by_author(
        &self,
        author_id: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, CustomError> {
        Ok(self.page_where(page, |post| post.author.id == author_id).await)
    }
}
