//! Integration tests
//!
//! Drive the HTTP router end to end against an in-memory exchange.

mod api_test;
mod config_test;
mod support;
