//! Integration tests for Velour.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p velour-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_pipeline` - Cart-to-order totals and replication scheduling
//! - `mirror_documents` - Mirror document building and decoding
//! - `catalog_queries` - GROQ query shapes and catalog payload decoding
//!
//! Tests here run without a live database or content platform; everything
//! that needs one is covered by the repository layer and exercised in
//! staging.

#![cfg_attr(not(test), forbid(unsafe_code))]
