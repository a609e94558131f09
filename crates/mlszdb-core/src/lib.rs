//! Core types and trait definitions for the mlszdb loader.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! knows how to look at a decoded JSON record and decide what a table row
//! for it would be; the `Store` and `Fetcher` traits are the seams through
//! which the crawl crate talks to the outside world.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod payload;
pub mod schema;
pub mod statement;
pub mod store;
pub mod value;

pub use error::{Error, Result};
