//! HTTP route handlers

pub mod history;
pub mod live;
