//! URL normalization.

use url::Url;

use crate::config::MAX_URL_LENGTH;

/// Normalizes a raw input line into a canonical absolute URL.
///
/// Trims whitespace, prepends `https://` when the value has no scheme, parses
/// it, strips any fragment and re-serializes. Values that are empty, carry a
/// scheme other than http/https, have no host, fail to parse, or exceed
/// `MAX_URL_LENGTH` after normalization are rejected.
///
/// The function is pure and idempotent: normalizing an already-normalized
/// URL returns it unchanged.
///
/// # Arguments
///
/// * `raw` - One line of input
///
/// # Returns
///
/// `Some(normalized_url)` if the input is usable, `None` otherwise.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = match explicit_scheme(trimmed) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => {
            trimmed.to_string()
        }
        Some(_) => return None,
        None => format!("https://{trimmed}"),
    };

    if candidate.len() > MAX_URL_LENGTH {
        return None;
    }

    let mut parsed = Url::parse(&candidate).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return None,
    }
    parsed.set_fragment(None);

    let normalized = String::from(parsed);
    if normalized.len() > MAX_URL_LENGTH {
        return None;
    }
    Some(normalized)
}

/// Returns the scheme of `value` if it starts with `<scheme>://`.
fn explicit_scheme(value: &str) -> Option<&str> {
    let (scheme, _) = value.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        Some(scheme)
    } else {
        None
    }
}
