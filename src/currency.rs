//! Currency code to display symbol lookup

use crate::error::PluginError;

/// Supported currency codes and their unit symbols
///
/// No fallback symbol: an unknown code is rejected at startup.
pub const SUPPORTED_CURRENCIES: &[(&str, &str)] = &[
    ("btc", "BTC"),
    ("eth", "ETH"),
    ("eur", "€"),
    ("usd", "$"),
    ("aud", "A$"),
    ("gbp", "£"),
    ("chf", "CHF"),
    ("pln", "zł"),
    ("cad", "C$"),
    ("huf", "Ft"),
    ("nok", "kr"),
    ("sek", "kr"),
    ("czk", "Kč"),
    ("uah", "₴"),
];

/// Returns the display symbol for a currency code
///
/// # Errors
/// `PluginError::Configuration` if the code is not in [`SUPPORTED_CURRENCIES`].
pub fn currency_symbol(code: &str) -> Result<&'static str, PluginError> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, symbol)| *symbol)
        .ok_or_else(|| PluginError::configuration(format!("Unsupported currency: '{}'", code)))
}
