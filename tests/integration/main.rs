//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the listing catalog and drive
//! enumeration, fetching and extraction end-to-end.

mod common;
mod fetch_tests;
mod harvest_tests;
