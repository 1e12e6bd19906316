//! FEMA feed outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `DisasterFeedSource` port.

mod dto;
mod http_source;

pub use http_source::{FemaHttpSource, DEFAULT_FEED_ENDPOINT, DEFAULT_FEED_TIMEOUT};
