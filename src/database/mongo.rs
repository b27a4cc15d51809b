use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Client, Collection, options::ClientOptions};

use super::repository::PostRepository;
use crate::config::AppConfig;
use crate::post::model::{Post, PostStatus};
use crate::utils::error::CustomError;
use crate::utils::pagination::{Page, PageRequest};

/// Connects to MongoDB and pings the server.
pub async fn connect_to_mongo(config: &AppConfig) -> Result<Client, CustomError> {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    client_options.app_name = Some(config.service_name.clone());

    let client = Client::with_options(client_options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    info!("Connected successfully to MongoDB");
    Ok(client)
}

pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection::<Post>("posts");
        MongoPostRepository { collection }
    }

    async fn page_where(&self, filter: Document, page: PageRequest) -> Result<Page<Post>, CustomError> {
        let total = self.collection.count_documents(filter.clone()).await?;
        if page.skip() >= total {
            return Ok(Page {
                items: Vec::new(),
                current_page: page.page,
                total_pages: page.total_pages(total),
            });
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .skip(page.skip())
            .limit(page.limit as i64)
            .await?;
        let items: Vec<Post> = cursor.try_collect().await?;

        Ok(Page {
            items,
            current_page: page.page,
            total_pages: page.total_pages(total),
        })
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn save(&self, post: &Post) -> Result<(), CustomError> {
        self.collection
            .replace_one(doc! { "_id": post.id }, post)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_by_status(
        &self,
        status: PostStatus,
        page: PageRequest,
    ) -> Result<Page<Post>, CustomError> {
        self.page_where(doc! { "status": status.as_str() }, page).await
    }

    async fn find_by_author(
        &self,
        author_id: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, CustomError> {
        self.page_where(doc! { "author.id": author_id }, page).await
    }
}
