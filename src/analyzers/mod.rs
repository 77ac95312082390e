//! Quarterback aggregation and rating.
//!
//! This module folds play-by-play records into per-passer season summaries,
//! standardizes and weights their features, and scales the result onto a
//! 50-99 rating with a strict ranking.

pub mod aggregate;
pub mod analyzer;
pub mod rating;
pub mod types;
pub mod utility;
