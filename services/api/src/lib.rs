//! services/api/src/lib.rs
//!
//! The HTTP service for the lesson planner: adapters for the external
//! collaborators, configuration, and the Axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
