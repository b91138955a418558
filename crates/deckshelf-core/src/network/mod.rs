//! Network utilities for artwork downloads.
//!
//! This module provides:
//! - HTTP client with timeout and user agent
//! - Download manager with temp-file-then-rename placement
//!
//! Failed downloads are not retried here; they abort the enclosing catalog
//! operation and surface to the caller.

mod client;
mod download;

pub use client::HttpClient;
pub use download::DownloadManager;
