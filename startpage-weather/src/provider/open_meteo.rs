//! Open-Meteo geocoding and forecast client (<https://open-meteo.com>).
//!
//! Neither endpoint needs an API key.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{Coordinates, OpenMeteoConfig, WeatherError, WeatherReading};

use super::WeatherProvider;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation,weather_code,\
                              wind_speed_10m,wind_direction_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    config: OpenMeteoConfig,
    http: Client,
}

impl OpenMeteoProvider {
    /// Create a provider whose requests are bounded by `config.timeout_secs`.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::network("Failed to build HTTP client", e))?;

        Ok(Self { config, http })
    }

    /// Send a request and return the body of a 2xx response.
    async fn fetch_body(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<String, WeatherError> {
        let res = request
            .send()
            .await
            .map_err(|e| WeatherError::network(context, e))?;

        if let Some(source) = res.error_for_status_ref().err() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = ?source.status(), body = %truncate_body(&body), "{context}");
            return Err(WeatherError::network(context, source));
        }

        res.text()
            .await
            .map_err(|e| WeatherError::network(context, e))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    // Omitted or null when nothing matches.
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentData,
    daily: DailyData,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(default)]
    time: Option<String>,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    precipitation: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    #[serde(default)]
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

fn parse_geocoding(city: &str, body: &str) -> Result<Coordinates, WeatherError> {
    let parsed: GeocodingResponse = serde_json::from_str(body).map_err(|e| {
        warn!(city, body = %truncate_body(body), error = %e, "Unexpected geocoding response format");
        WeatherError::malformed(format!("geocoding response: {e}"))
    })?;

    let first = parsed.results.unwrap_or_default().into_iter().next().ok_or_else(|| {
        debug!(city, "Geocoding returned no candidates");
        WeatherError::not_found(city)
    })?;

    info!(
        city,
        matched = first.name.as_deref().unwrap_or(city),
        latitude = first.latitude,
        longitude = first.longitude,
        "Geocoded city"
    );

    Ok(Coordinates::new(first.latitude, first.longitude))
}

fn parse_forecast(body: &str) -> Result<WeatherReading, WeatherError> {
    let parsed: ForecastResponse = serde_json::from_str(body).map_err(|e| {
        warn!(body = %truncate_body(body), error = %e, "Unexpected forecast response format");
        WeatherError::malformed(format!("forecast response: {e}"))
    })?;

    let current = parsed.current;
    let daily = parsed.daily;

    let temperature_max_c = *daily.temperature_2m_max.first().ok_or_else(|| {
        warn!("Forecast has no daily maximum temperature");
        WeatherError::malformed("missing field daily.temperature_2m_max[0]")
    })?;
    let temperature_min_c = *daily.temperature_2m_min.first().ok_or_else(|| {
        warn!("Forecast has no daily minimum temperature");
        WeatherError::malformed("missing field daily.temperature_2m_min[0]")
    })?;

    if temperature_min_c > temperature_max_c {
        warn!(temperature_min_c, temperature_max_c, "Daily minimum exceeds maximum");
        return Err(WeatherError::malformed(format!(
            "daily minimum {temperature_min_c} exceeds maximum {temperature_max_c}"
        )));
    }

    if !(0.0..=100.0).contains(&current.relative_humidity_2m) {
        warn!(humidity = current.relative_humidity_2m, "Humidity out of range");
        return Err(WeatherError::malformed(format!(
            "relative humidity {} is outside 0-100",
            current.relative_humidity_2m
        )));
    }

    Ok(WeatherReading {
        temperature_c: current.temperature_2m,
        humidity_pct: current.relative_humidity_2m.trunc() as u8,
        precipitation_mm: current.precipitation,
        weather_code: current.weather_code,
        wind_speed_kmh: current.wind_speed_10m,
        wind_direction_deg: current.wind_direction_10m,
        temperature_min_c,
        temperature_max_c,
        observed_at: current.time.as_deref().and_then(parse_local_datetime),
        date: daily.time.first().and_then(|d| parse_local_date(d)),
    })
}

fn parse_local_datetime(s: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"));
    if parsed.is_err() {
        debug!(time = s, "Ignoring unparseable observation time");
    }
    parsed.ok()
}

fn parse_local_date(s: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(s, "%Y-%m-%d");
    if parsed.is_err() {
        debug!(date = s, "Ignoring unparseable forecast date");
    }
    parsed.ok()
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    #[instrument(skip(self))]
    async fn resolve(&self, city: &str) -> Result<Coordinates, WeatherError> {
        let url = format!("{}/search", self.config.geocoding_url);
        let request = self.http.get(&url).query(&[
            ("name", city),
            ("count", "1"),
            ("language", self.config.language.as_str()),
            ("format", "json"),
        ]);

        debug!(url = %url, "Geocoding city");
        let body = self
            .fetch_body(request, "Geocoding request to Open-Meteo failed")
            .await
            .inspect_err(|e| debug!(city, error = %e, "Geocoding request failed"))?;

        parse_geocoding(city, &body)
    }

    #[instrument(skip(self), fields(lat = %coordinates.latitude, lon = %coordinates.longitude))]
    async fn current_conditions(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/forecast", self.config.forecast_url);
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();
        let request = self.http.get(&url).query(&[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("current", CURRENT_FIELDS),
            ("daily", DAILY_FIELDS),
            ("timezone", "auto"),
        ]);

        debug!(url = %url, "Fetching current weather");
        let body = self
            .fetch_body(request, "Forecast request to Open-Meteo failed")
            .await
            .inspect_err(|e| debug!(error = %e, "Forecast request failed"))?;

        parse_forecast(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
