use num_format::Locale;
use rust_decimal::{Decimal, RoundingStrategy};

/// Grouping convention for every currency value shown to users.
const CURRENCY_LOCALE: Locale = Locale::en;

/// Renders a USD amount as `$1,234.56`.
///
/// Half-cent ties round away from zero, matching `en-US` currency display.
/// Unparsable amounts render as `$NaN` rather than being hidden.
pub fn format_usd(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => "$NaN".to_string(),
        Some(v) if v.is_infinite() => {
            if v > 0.0 { "$∞".to_string() } else { "$-∞".to_string() }
        }
        Some(v) => {
            let fixed = match Decimal::from_f64_retain(v.abs()) {
                Some(exact) => format!(
                    "{:.2}",
                    exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                ),
                // Past Decimal's range every f64 is a whole number
                None => format!("{:.2}", v.abs()),
            };
            let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
            let sign = if v < 0.0 { "-" } else { "" };
            format!("${}{}.{}", sign, group_thousands(int_part), frac_part)
        }
        None => "$NaN".to_string(),
    }
}

/// Inserts the locale separator every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let separator = CURRENCY_LOCALE.separator();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }
    grouped
}
