//! Domain logic

pub mod challenge;
