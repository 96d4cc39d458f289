//! Integration Tests
//!
//! End-to-end tests through the public `studymatch` API:
//! - corpus: ingestion JSON to persisted records
//! - ranking: game to ranked, annotated chapters
//! - config: TOML configuration driving the pipeline

#[path = "../common/mod.rs"]
mod common;

mod config;
mod corpus;
mod ranking;
