pub mod error;
pub mod helpers;
pub mod pagination;
