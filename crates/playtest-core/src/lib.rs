//! Core types and coverage logic for the playtest tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! consumes a [`catalog::Catalog`] and a list of [`play::PlayRecord`]s and
//! produces derived tables (coverage, gaps, observed combinations,
//! frequencies). Nothing derived is ever stored; every report is recomputed
//! from the play log.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod canonical;
pub mod catalog;
pub mod combination;
pub mod coverage;
pub mod density;
pub mod error;
pub mod observed;
pub mod play;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
