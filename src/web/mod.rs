//! HTTP pages for browsing, adding and deleting cafes

pub mod csrf;
pub mod handlers;
pub mod models;
pub mod server;
