//! Parley worker process library logic.

pub mod config;
pub mod health;
