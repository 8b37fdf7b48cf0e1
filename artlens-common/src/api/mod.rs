//! Shared API types
//!
//! Types exchanged between the identification service and its clients.
//!
//! # Design Principle
//!
//! This module contains ONLY plain data types and pure helpers (no HTTP
//! framework dependencies). Services wrap them with framework-specific
//! extractors and responses.

pub mod types;

pub use types::{ArtworkRecord, GeoLocation, IdentifyResponse, Locale};
