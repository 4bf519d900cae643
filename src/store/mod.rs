// src/store/mod.rs

//! Database access for the grading core.
//!
//! Every function takes a `&mut PgConnection` so callers can run it on a
//! pooled connection or inside a transaction (`&mut *tx`).

pub mod answers;
pub mod assignments;
pub mod questions;
pub mod results;
