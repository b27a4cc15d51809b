pub mod memory;
pub mod mongo;
pub mod repository;

pub use memory::InMemoryPostRepository;
pub use mongo::{MongoPostRepository, connect_to_mongo};
pub use repository::PostRepository;
