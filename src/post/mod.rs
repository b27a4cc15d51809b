pub mod controller;
pub mod index;
pub mod model;
pub mod moderation;
pub mod service;
pub mod view;
