//! Kitchen context injected into chat and vision prompts.

/// Regional conventions a kitchen assistant should follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    country: &'static str,
    units: &'static str,
    temperature: &'static str,
    currency: &'static str,
}

const REGIONS: &[(&str, Region)] = &[
    ("US", Region { country: "the United States", units: "US customary units (cups, ounces, pounds)", temperature: "Fahrenheit", currency: "USD" }),
    ("CA", Region { country: "Canada", units: "metric units, with cups and spoons for home-scale recipes", temperature: "Celsius", currency: "CAD" }),
    ("MX", Region { country: "Mexico", units: "metric units", temperature: "Celsius", currency: "MXN" }),
    ("GB", Region { country: "the United Kingdom", units: "metric units", temperature: "Celsius", currency: "GBP" }),
    ("IE", Region { country: "Ireland", units: "metric units", temperature: "Celsius", currency: "EUR" }),
    ("FR", Region { country: "France", units: "metric units", temperature: "Celsius", currency: "EUR" }),
    ("DE", Region { country: "Germany", units: "metric units", temperature: "Celsius", currency: "EUR" }),
    ("ES", Region { country: "Spain", units: "metric units", temperature: "Celsius", currency: "EUR" }),
    ("IT", Region { country: "Italy", units: "metric units", temperature: "Celsius", currency: "EUR" }),
    ("JP", Region { country: "Japan", units: "metric units", temperature: "Celsius", currency: "JPY" }),
    ("IN", Region { country: "India", units: "metric units", temperature: "Celsius", currency: "INR" }),
    ("AU", Region { country: "Australia", units: "metric units", temperature: "Celsius", currency: "AUD" }),
    ("BR", Region { country: "Brazil", units: "metric units", temperature: "Celsius", currency: "BRL" }),
];

const DEFAULT_REGION: Region = Region {
    country: "the restaurant's country",
    units: "metric units",
    temperature: "Celsius",
    currency: "the local currency",
};

/// System prompt for a restaurant kitchen in `country_code`.
///
/// Unknown or empty codes fall back to metric conventions. `extra` is
/// appended verbatim.
///
/// # Example
///
/// ```
/// use galley::kitchen_system_prompt;
///
/// let prompt = kitchen_system_prompt("us", None);
/// assert!(prompt.contains("Fahrenheit"));
/// ```
pub fn kitchen_system_prompt(country_code: &str, extra: Option<&str>) -> String {
    let code = country_code.trim().to_ascii_uppercase();
    let region = REGIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, region)| *region)
        .unwrap_or(DEFAULT_REGION);

    let mut prompt = format!(
        "You are an assistant for a professional restaurant kitchen in {}. \
Give practical, concise answers a line cook or chef can act on during service. \
Use {} for quantities, {} for temperatures, and {} for prices. \
Follow local food safety practice and flag allergens when relevant.",
        region.country, region.units, region.temperature, region.currency
    );

    if let Some(extra) = extra.map(str::trim).filter(|extra| !extra.is_empty()) {
        prompt.push_str("\n\n");
        prompt.push_str(extra);
    }
    prompt
}
