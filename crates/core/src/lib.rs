//! Domain logic for the Armis site monitor.
//!
//! Everything in this crate is transport-agnostic: readings arrive as JSON
//! values, and the risk scorer and trigger evaluator are pure functions over
//! them. The only shared mutable state is [`store::LatestReadingStore`].

pub mod alert;
pub mod error;
pub mod field_names;
pub mod reading;
pub mod risk;
pub mod store;
pub mod triggers;
pub mod types;
