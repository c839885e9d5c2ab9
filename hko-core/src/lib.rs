//! Retrieval core for Hong Kong Observatory weather feeds.
//!
//! This crate defines:
//! - Nearest-grid-point resolution over the two bundled reference grids
//! - A feed client for the Observatory's loosely-structured endpoints
//! - One parsing strategy per feed format
//! - A retrieval service wrapping every outcome in a status-coded envelope
//!
//! It is used by `hko-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod feed;
pub mod geo;
pub mod model;
pub mod parse;
pub mod service;

pub use config::Config;
pub use feed::{FeedClient, FeedError, HttpTransport, Transport};
pub use geo::{Coordinate, GridError, GridIndex, GridPoint, Nearest, distance_km};
pub use model::{
    Envelope, Forecast, ForecastDay, Lang, LocalWeather, Payload, RainfallNowcast, RainfallWindow,
    Status, UvReport, WarningSummary,
};
pub use parse::ParseError;
pub use service::WeatherService;
