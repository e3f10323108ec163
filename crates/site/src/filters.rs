//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Percent-encode a value for use in a query string or path segment.
///
/// Usage in templates: `/requestform?product={{ name|url_component }}`
#[askama::filter_fn]
pub fn url_component(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(urlencoding::encode(&value.to_string()).into_owned())
}

/// `tel:` link target: digits and a leading plus only.
///
/// Usage in templates: `href="tel:{{ phone|tel_href }}"`
#[askama::filter_fn]
pub fn tel_href(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(tel_digits(&value.to_string()))
}

fn tel_digits(phone: &str) -> String {
    phone
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '+'))
        .map(|(_, c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tel_digits() {
        assert_eq!(tel_digits("(512) 555-0199"), "5125550199");
        assert_eq!(tel_digits("+1 512.555.0199"), "+15125550199");
    }
}
