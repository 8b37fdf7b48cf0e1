//! # ArtLens Common Library
//!
//! Shared code for ArtLens services including:
//! - Wire types exchanged with the mobile client (locale, geolocation, artwork record)
//! - Configuration loading (TOML + environment + compiled defaults)
//! - Common error type

pub mod api;
pub mod config;
pub mod error;

pub use api::types::{ArtworkRecord, GeoLocation, IdentifyResponse, Locale};
pub use error::{Error, Result};
