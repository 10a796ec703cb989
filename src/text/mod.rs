//! Text processing for cipher analysis.
//!
//! This module provides:
//! - Normalization of raw input into a canonical `A-Z` letter stream
//! - Column splitting at a given key length, and its inverse

pub mod columns;
pub mod normalize;

pub use columns::{interleave_columns, split_columns};
pub use normalize::normalize;
