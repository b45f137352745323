use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wind;

/// Geographic position of a resolved city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Current conditions plus today's temperature extremes for one location.
///
/// Precipitation is the instantaneous current value reported by the provider,
/// not a daily accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub precipitation_mm: f64,
    pub weather_code: i32,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub temperature_min_c: f64,
    pub temperature_max_c: f64,
    /// Local time of the observation, when the provider reports one.
    pub observed_at: Option<NaiveDateTime>,
    /// Local calendar day the extremes belong to.
    pub date: Option<NaiveDate>,
}

/// Paragraph text for a reading, e.g.
/// `2°C - 7°C Humidity: 61% Precipitation: 0.0mm Wind: 9km/h ↖`.
///
/// Temperatures and wind speed are truncated toward zero. Precipitation is
/// always shown with exactly one decimal, so 2.46 prints as `2.5mm` and 5
/// prints as `5.0mm`; hundredths reported by the provider are not shown.
pub fn format_summary(reading: &WeatherReading) -> String {
    format!(
        "{}°C - {}°C Humidity: {}% Precipitation: {:.1}mm Wind: {}km/h {}",
        reading.temperature_min_c.trunc() as i64,
        reading.temperature_max_c.trunc() as i64,
        reading.humidity_pct,
        reading.precipitation_mm,
        reading.wind_speed_kmh.trunc() as i64,
        wind::arrow_for(reading.wind_direction_deg),
    )
}

/// A block accepted by the page publisher.
///
/// Serialises to the publisher's block JSON, for example
/// `{"type":"paragraph","paragraph":{"rich_text":[{"type":"text","text":{"content":"..."}}]}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBlock {
    Heading2(String),
    Paragraph(String),
}

impl DisplayBlock {
    pub fn block_type(&self) -> &'static str {
        match self {
            Self::Heading2(_) => "heading_2",
            Self::Paragraph(_) => "paragraph",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Heading2(text) | Self::Paragraph(text) => text,
        }
    }
}

#[derive(Serialize)]
struct RichTextBody<'a> {
    rich_text: [RichText<'a>; 1],
}

#[derive(Serialize)]
struct RichText<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextContent<'a>,
}

#[derive(Serialize)]
struct TextContent<'a> {
    content: &'a str,
}

impl Serialize for DisplayBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = RichTextBody {
            rich_text: [RichText {
                kind: "text",
                text: TextContent { content: self.text() },
            }],
        };

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.block_type())?;
        map.serialize_entry(self.block_type(), &body)?;
        map.end()
    }
}
