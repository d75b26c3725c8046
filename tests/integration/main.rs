//! Integration tests for Mall-Spider
//!
//! These tests use wiremock to serve site pages and run the stages
//! end-to-end against a scratch database.

mod config_tests;
mod spider_tests;
