use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::post::model::{Post, PostStatus};
use crate::utils::error::CustomError;
use crate::utils::pagination::{Page, PageRequest};

/// Storage for whole post aggregates (the post plus its comments and likes).
///
/// List queries return newest posts first.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;

    /// Inserts or overwrites the whole aggregate.
    async fn save(&self, post: &Post) -> Result<(), CustomError>;

    async fn find_by_status(
        &self,
        status: PostStatus,
        page: PageRequest,
    ) -> Result<Page<Post>, CustomError>;

    async fn find_by_author(
        &self,
        author_id: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, CustomError>;
}
