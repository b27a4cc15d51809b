use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use env_logger::Env;
use log::{error, info};

use confessions_backend::config::{AppConfig, StorageBackend};
use confessions_backend::database::{
    InMemoryPostRepository, MongoPostRepository, PostRepository, connect_to_mongo,
};
use confessions_backend::middleware::error_handler::handle_error;
use confessions_backend::middleware::not_found::not_found;
use confessions_backend::post::service::PostService;
use confessions_backend::router::index::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let repository: Arc<dyn PostRepository> = match config.storage_backend {
        StorageBackend::Mongo => {
            let client = connect_to_mongo(&config)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Arc::new(MongoPostRepository::new(&client, &config.mongodb_database))
        }
        StorageBackend::Memory => {
            info!("Using in-memory post storage; data is lost on restart");
            Arc::new(InMemoryPostRepository::new())
        }
    };

    if config.cloudinary.is_none() {
        info!("Cloudinary is not configured; image uploads are disabled");
    }

    let post_service = web::Data::new(PostService::new(repository));
    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    info!("Starting server on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(config.clone())
            .app_data(post_service.clone())
            .configure(routes)
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
    })
    .bind(bind)?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
