use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config, Coordinates, WeatherError, WeatherReading, provider::open_meteo::OpenMeteoProvider,
};

pub mod open_meteo;

/// Source of coordinates and conditions for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a free-text city name to coordinates. First match wins.
    async fn resolve(&self, city: &str) -> Result<Coordinates, WeatherError>;

    /// Current conditions and today's extremes at `coordinates`.
    async fn current_conditions(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReading, WeatherError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let provider = OpenMeteoProvider::new(config.open_meteo.clone())?;
    Ok(Box::new(provider))
}
