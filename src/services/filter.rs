use crate::models::PoolRecord;

/// Parses the longest numeric prefix of `text`, the way upstream values
/// such as `"10.0%"` or `" 1.5e3 USD"` are meant to be read.
///
/// Returns `None` when there is no numeric prefix at all.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        let value = f64::INFINITY;
        return Some(if bytes[0] == b'-' { -value } else { value });
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

pub fn parse_field(field: Option<&str>) -> Option<f64> {
    field.and_then(parse_leading_float)
}

/// Keeps only pools that are funded and yielding.
#[derive(Clone, Copy, Default)]
pub struct PoolFilter;

impl PoolFilter {
    pub fn new() -> Self {
        Self
    }

    /// Both TVL and APR must parse and be strictly positive.
    /// Unparsable values fail the comparison and the record is dropped.
    pub fn is_active(&self, record: &PoolRecord) -> bool {
        let tvl = parse_field(record.total_value_locked.as_deref());
        let apr = parse_field(record.apr.as_deref());

        let active = matches!((tvl, apr), (Some(t), Some(a)) if t > 0.0 && a > 0.0);
        if !active {
            tracing::trace!(
                "    ✗ excluded {} (tvl={:?}, apr={:?})",
                record.market.as_deref().unwrap_or("?"),
                record.total_value_locked,
                record.apr
            );
        }
        active
    }
}
