//! Content hashing for sml-share.
//!
//! A payload's identity is the lowercase hex SHA-256 digest of its raw bytes.
//! All hashing wraps the `sha2` crate.

pub mod hasher;

pub use hasher::ContentHasher;
