//! Moderated anonymous posting with likes and threaded comments.
//!
//! Posts start out pending and only accept comments, replies and likes once
//! a moderator approves them. Comments are stored flat on their post and
//! rebuilt into one level of replies when a post is rendered for a viewer.

pub mod comment;
pub mod config;
pub mod database;
pub mod engagement;
pub mod middleware;
pub mod post;
pub mod router;
pub mod uploader;
pub mod utils;
