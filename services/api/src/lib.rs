//! services/api/src/lib.rs
//!
//! The QuickCards HTTP service: configuration, adapters for the completion API
//! and PostgreSQL, and the axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
