//! Gateway Service - relays the remote users/posts API, stores image uploads and
//! keeps a local snapshot of posts.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
