//! API route handlers

pub mod completions;
pub mod groups;
pub mod health;
pub mod users;
