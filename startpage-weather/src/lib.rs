//! Weather section of the daily start page.
//!
//! This crate defines:
//! - Configuration of the Open-Meteo endpoints
//! - Abstraction over weather providers and the Open-Meteo implementation
//! - The WMO condition symbol table and wind arrows
//! - [`fetch_weather`], which turns a city name into two display blocks
//!
//! It is used by `startpage-cli`, but can also be called from any orchestrator
//! that publishes blocks to the start page.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod symbol;
pub mod weather;
pub mod wind;

pub use config::{Config, OpenMeteoConfig};
pub use error::WeatherError;
pub use model::{Coordinates, DisplayBlock, WeatherReading, format_summary};
pub use provider::{WeatherProvider, open_meteo::OpenMeteoProvider, provider_from_config};
pub use symbol::{FALLBACK_SYMBOL, SYMBOLS, symbol_for};
pub use weather::{fetch_weather, render_blocks};
pub use wind::{CompassPoint, arrow_for};
