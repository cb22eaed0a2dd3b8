//! etv-ledger library
//!
//! Tracks orders acquired through a promotional review program: acquisition
//! cost (ETV), delivery and cancellation state, and the user-adjustable
//! personal-use value factor used for tax reporting. The crate exposes a
//! filterable order query engine, bulk import, per-order point updates and
//! a monthly reporting reduction; the HTTP surface that drives them lives
//! in the embedding application.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod queries;
pub mod reports;
pub mod services;

pub use errors::{AppError, ServiceError};
pub use queries::order_queries::{
    OrderFilterOptions, OrderSearchResult, OrderSortKey, Query, SearchOrdersQuery, SortDir,
};
