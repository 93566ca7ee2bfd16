//! Core library for campvue
//!
//! This crate implements the **Functional Core** of the campvue application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`campvue_core`** (this crate): validation, pagination decisions and result
//!   shaping, with zero I/O
//! - **`campvue`**: the RIDB HTTP client, the CLI and the HTTP server (the
//!   Imperative Shell)
//!
//! Every function here is deterministic and can be tested with fixture data. The
//! shell fetches bytes, hands decoded JSON to [`ridb`] for validation, drives a
//! [`pagination::Aggregation`] until it reports `Done`, and shapes the records
//! with [`normalize`].
//!
//! # Module Organization
//!
//! - [`query`]: limit/offset/page-budget validation
//! - [`ridb`]: RIDB wire types and the structural validation gate
//! - [`pagination`]: the paged aggregation state machine
//! - [`attributes`]: campsite attribute classification
//! - [`normalize`]: activity, campsite, facility and vehicle-length outputs
//! - [`text`]: title casing, HTML-to-text and site number helpers
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use campvue_core::pagination::{Aggregation, AggregationPlan, Phase};
//! use campvue_core::ridb::Page;
//!
//! let plan = AggregationPlan::new(50, 0, 10)?;
//! let mut aggregation = Aggregation::new(plan);
//!
//! while let Some(request) = aggregation.next_request() {
//!     let page: Page<RidbActivity> = fetch(request)?;
//!     aggregation.accept(page);
//!     aggregation.evaluate();
//! }
//!
//! let aggregated = aggregation.finish()?;
//! ```

pub mod attributes;
pub mod normalize;
pub mod pagination;
pub mod query;
pub mod ridb;
pub mod text;
