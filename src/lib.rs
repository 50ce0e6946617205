//! dochat - a CLI chat client for a document question-answering service
//!
//! This crate provides:
//! - A conversation engine: an append-only turn log with a bounded
//!   history window sent as context with each query
//! - Batch document upload with per-file result reconciliation
//! - A typed HTTP client for the backend's ingest/chat API

pub mod backend;
pub mod chat;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod models;
pub mod upload;

pub use config::Config;
pub use controller::ClientController;
pub use error::{Error, Result};
