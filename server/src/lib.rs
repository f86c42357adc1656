//! Hard75 server library
//!
//! A squad accountability tracker for the 75 Hard challenge: shared day
//! boundaries per squad, streaks recomputed from the completion log, and
//! lazy healing of timezone mistakes.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
