//! Weather blocks for one city: geocode, fetch, render.

use tracing::{error, info, instrument};

use crate::{
    DisplayBlock, WeatherError, WeatherProvider, WeatherReading, model::format_summary,
    symbol::symbol_for, wind::CompassPoint,
};

/// Fetch weather for `city` and render it as a heading and a paragraph.
///
/// The heading carries the condition glyph and `city` exactly as given. Any
/// failure aborts the call; no partial blocks are returned.
#[instrument(skip_all, fields(city = %city))]
pub async fn fetch_weather<P>(provider: &P, city: &str) -> Result<[DisplayBlock; 2], WeatherError>
where
    P: WeatherProvider + ?Sized,
{
    let coordinates = provider
        .resolve(city)
        .await
        .inspect_err(|e| log_failure(city, e))?;

    let reading = provider
        .current_conditions(coordinates)
        .await
        .inspect_err(|e| log_failure(city, e))?;

    info!(
        city,
        %coordinates,
        observed_at = ?reading.observed_at,
        date = ?reading.date,
        wind = %CompassPoint::from_bearing(reading.wind_direction_deg),
        "Successfully fetched weather"
    );
    Ok(render_blocks(city, &reading))
}

/// Build the two display blocks for a reading.
pub fn render_blocks(city: &str, reading: &WeatherReading) -> [DisplayBlock; 2] {
    [
        DisplayBlock::Heading2(format!("{} {}", symbol_for(reading.weather_code), city)),
        DisplayBlock::Paragraph(format_summary(reading)),
    ]
}

fn log_failure(city: &str, err: &WeatherError) {
    match err {
        WeatherError::NotFound { .. } => {
            error!(city, error = %err, "Error fetching weather");
        }
        WeatherError::Network { .. } => {
            error!(city, error = %err, timeout = err.is_timeout(), "Network error fetching weather");
        }
        WeatherError::MalformedResponse(_) => {
            error!(city, error = %err, "Unexpected API response format");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinates, symbol::FALLBACK_SYMBOL};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[derive(Debug)]
    struct FakeProvider {
        coordinates: Option<Coordinates>,
        reading: Option<WeatherReading>,
        forecast_calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(coordinates: Option<Coordinates>, reading: Option<WeatherReading>) -> Self {
            Self { coordinates, reading, forecast_calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn resolve(&self, city: &str) -> Result<Coordinates, WeatherError> {
            self.coordinates.ok_or_else(|| WeatherError::not_found(city))
        }

        async fn current_conditions(
            &self,
            _coordinates: Coordinates,
        ) -> Result<WeatherReading, WeatherError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            self.reading
                .clone()
                .ok_or_else(|| WeatherError::malformed("missing field `weather_code`"))
        }
    }

    fn reading(weather_code: i32) -> WeatherReading {
        WeatherReading {
            temperature_c: 7.0,
            humidity_pct: 61,
            precipitation_mm: 0.0,
            weather_code,
            wind_speed_kmh: 9.0,
            wind_direction_deg: 315.0,
            temperature_min_c: 2.0,
            temperature_max_c: 7.0,
            observed_at: None,
            date: None,
        }
    }

    #[tokio::test]
    async fn renders_heading_and_paragraph() {
        let provider = FakeProvider::new(Some(Coordinates::new(51.5, -0.12)), Some(reading(1)));

        let blocks = fetch_weather(&provider, "London").await.expect("should succeed");

        assert_eq!(blocks[0], DisplayBlock::Heading2("🌤 London".to_string()));
        assert_eq!(
            blocks[1],
            DisplayBlock::Paragraph(
                "2°C - 7°C Humidity: 61% Precipitation: 0.0mm Wind: 9km/h ↖".to_string()
            )
        );
    }

    #[tokio::test]
    async fn unknown_code_degrades_to_fallback_glyph() {
        let provider = FakeProvider::new(Some(Coordinates::new(52.52, 13.4)), Some(reading(999)));

        let blocks = fetch_weather(&provider, "Berlin").await.expect("should succeed");
        assert_eq!(blocks[0].text(), format!("{FALLBACK_SYMBOL} Berlin"));
    }

    #[tokio::test]
    async fn not_found_skips_forecast() {
        let provider = FakeProvider::new(None, Some(reading(1)));

        let err = fetch_weather(&provider, "InvalidCity123456789").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("InvalidCity123456789"));
        assert_eq!(provider.forecast_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_forecast_propagates_unchanged() {
        let provider = FakeProvider::new(Some(Coordinates::new(40.71, -74.0)), None);

        let err = fetch_weather(&provider, "NYC").await.unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(provider.forecast_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let provider: Box<dyn WeatherProvider> =
            Box::new(FakeProvider::new(Some(Coordinates::new(0.0, 0.0)), Some(reading(0))));

        let blocks = fetch_weather(provider.as_ref(), "Quito").await.expect("should succeed");
        assert_eq!(blocks[0].text(), "☀️ Quito");
    }

    #[tokio::test]
    async fn success_log_carries_observation_time_and_wind() {
        let observed = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let reading = WeatherReading {
            observed_at: Some(observed),
            date: Some(observed.date()),
            ..reading(1)
        };
        let provider = FakeProvider::new(Some(Coordinates::new(51.5, -0.12)), Some(reading));
        let (logs, _guard) = capture_logs();

        fetch_weather(&provider, "London").await.expect("should succeed");

        let output = logs.contents();
        assert!(output.contains("Successfully fetched weather"), "logs: {output}");
        assert!(output.contains("2024-01-15T12:00:00"), "logs: {output}");
        assert!(output.contains("wind=NW"), "logs: {output}");
    }

    #[tokio::test]
    async fn each_failure_logs_one_error() {
        let provider = FakeProvider::new(Some(Coordinates::new(40.71, -74.0)), None);
        let (logs, _guard) = capture_logs();

        fetch_weather(&provider, "NYC").await.unwrap_err();

        let output = logs.contents();
        assert_eq!(output.matches("ERROR").count(), 1, "logs: {output}");
        assert!(output.contains("Unexpected API response format"), "logs: {output}");
        assert!(output.contains("NYC"), "logs: {output}");
    }

    #[test]
    fn heading_uses_city_as_supplied() {
        let blocks = render_blocks("new york", &reading(3));
        assert_eq!(blocks[0].text(), "☁️ new york");
        assert_eq!(blocks[0].block_type(), "heading_2");
        assert_eq!(blocks[1].block_type(), "paragraph");
    }
}
