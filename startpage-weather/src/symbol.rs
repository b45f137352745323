//! Condition symbol table: WMO weather codes to display glyphs.
//!
//! See <https://open-meteo.com/en/docs> for the WMO code reference.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Glyph shown for any code outside [`SYMBOLS`].
pub const FALLBACK_SYMBOL: &str = "❓";

/// Every WMO code with a dedicated glyph.
pub const SYMBOLS: &[(i32, &str)] = &[
    (0, "☀️"),
    (1, "🌤"),
    (2, "⛅️"),
    (3, "☁️"),
    (45, "🌫"),
    (48, "🌫"),
    (51, "🌦"),
    (53, "🌦"),
    (55, "🌧"),
    (56, "🌧"),
    (57, "🌧"),
    (61, "🌦"),
    (63, "🌧"),
    (65, "🌧"),
    (66, "🌧"),
    (67, "🌧"),
    (71, "🌨"),
    (73, "❄️"),
    (75, "❄️"),
    (77, "❄️"),
    (80, "🌦"),
    (81, "🌧"),
    (82, "🌧"),
    (85, "🌨"),
    (86, "❄️"),
    (95, "⛈"),
    (96, "⛈"),
    (99, "⛈"),
];

static TABLE: LazyLock<HashMap<i32, &'static str>> =
    LazyLock::new(|| SYMBOLS.iter().copied().collect());

/// Glyph for a WMO weather code, or [`FALLBACK_SYMBOL`] if the code is not in [`SYMBOLS`].
pub fn symbol_for(code: i32) -> &'static str {
    TABLE.get(&code).copied().unwrap_or(FALLBACK_SYMBOL)
}
