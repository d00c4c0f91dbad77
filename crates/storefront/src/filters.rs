//! Custom Askama template filters.

use std::borrow::Borrow;
use std::fmt::Display;

use menulane_core::Money;

/// Format a kobo amount as a naira price string.
///
/// Takes the amount via `Borrow` so templates can pipe both fields
/// (`{{ item.price|naira }}`) and computed values
/// (`{{ line.line_total()|naira }}`).
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn naira(amount: impl Borrow<Money>, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(amount.borrow().display())
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
