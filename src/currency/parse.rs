//! Permissive conversion of typed or file-sourced text into decimal amounts.
//!
//! Nothing here returns an error: input that does not contain a number
//! becomes zero so a half-typed value never blocks an edit.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::LocaleConfig;

/// Raw value handed to the parser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    Text(&'a str),
    Number(Decimal),
    Missing,
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(value: &'a str) -> Self {
        RawValue::Text(value)
    }
}

impl<'a> From<&'a String> for RawValue<'a> {
    fn from(value: &'a String) -> Self {
        RawValue::Text(value.as_str())
    }
}

impl From<Decimal> for RawValue<'_> {
    fn from(value: Decimal) -> Self {
        RawValue::Number(value)
    }
}

impl<'a, T> From<Option<T>> for RawValue<'a>
where
    T: Into<RawValue<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Missing)
    }
}

/// Parses a monetary value such as `R$ 1.234,56` into `1234.56`.
///
/// Uses the pt-BR separators, which is how statement files are written.
pub fn parse_amount<'a>(raw: impl Into<RawValue<'a>>) -> Decimal {
    parse_amount_in(raw, &LocaleConfig::pt_br())
}

/// Parses a monetary value written with `locale`'s decimal separator.
///
/// Every other non-digit character, the grouping separator included, is
/// dropped before parsing.
pub fn parse_amount_in<'a>(raw: impl Into<RawValue<'a>>, locale: &LocaleConfig) -> Decimal {
    match raw.into() {
        RawValue::Number(value) => value,
        RawValue::Missing => Decimal::ZERO,
        RawValue::Text(text) => parse_cleaned(text, locale.decimal_separator),
    }
}

/// Parses a percentage such as `50%` or `12,5` into `50` / `12.5`.
///
/// The result is the plain number, it is not divided by 100.
pub fn parse_percentage<'a>(raw: impl Into<RawValue<'a>>) -> Decimal {
    parse_amount(raw)
}

pub fn parse_percentage_in<'a>(raw: impl Into<RawValue<'a>>, locale: &LocaleConfig) -> Decimal {
    parse_amount_in(raw, locale)
}

fn parse_cleaned(text: &str, decimal_separator: char) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '-' || *ch == decimal_separator)
        .collect();
    let normalized = cleaned.replacen(decimal_separator, ".", 1);
    numeric_prefix(&normalized)
        .and_then(|prefix| Decimal::from_str(prefix).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Longest leading `-?digits[.digits]` slice, if it holds at least one digit.
fn numeric_prefix(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return None;
    }
    Some(&input[..end])
}
