//! Locale-aware money and percentage formatting plus the permissive parser.

pub mod parse;

pub use parse::{parse_amount, parse_amount_in, parse_percentage, parse_percentage_in, RawValue};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places shown for currency amounts.
pub const CURRENCY_PRECISION: u32 = 2;

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub currency_symbol: String,
    pub negative_style: NegativeStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::pt_br()
    }
}

impl LocaleConfig {
    pub fn pt_br() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            currency_symbol: "R$".into(),
            negative_style: NegativeStyle::Sign,
        }
    }

    /// Resolves a language tag; unknown tags fall back to pt-BR.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en-us" | "en" => Self {
                language_tag: "en-US".into(),
                decimal_separator: '.',
                grouping_separator: ',',
                ..Self::pt_br()
            },
            _ => Self::pt_br(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

/// Rounds to display precision, halves away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let mut body = format!("{:.*}", precision as usize, rounded);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    if let Some(pos) = body.find(locale.decimal_separator) {
        let int_part = insert_grouping(&body[..pos], locale.grouping_separator);
        format!("{}{}", int_part, &body[pos..])
    } else {
        insert_grouping(&body, locale.grouping_separator)
    }
}

fn insert_grouping(int_part: &str, separator: char) -> String {
    match int_part.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, separator)),
        None => group_digits(int_part, separator),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Formats an amount the way the statement prints it, e.g. `R$ 1.234,56`.
pub fn format_currency(amount: Decimal, locale: &LocaleConfig) -> String {
    let rounded = round_currency(amount);
    let body = format_number(locale, rounded.abs(), CURRENCY_PRECISION);
    let formatted = format!("{} {}", locale.currency_symbol, body);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        match locale.negative_style {
            NegativeStyle::Sign => format!("-{}", formatted),
            NegativeStyle::Parentheses => format!("({})", formatted),
        }
    } else {
        formatted
    }
}

/// Formats a percentage without trailing zeros, e.g. `50%` or `12,5%`.
pub fn format_percentage(value: Decimal, locale: &LocaleConfig) -> String {
    let text = value.normalize().to_string();
    let text = if locale.decimal_separator != '.' {
        text.replacen('.', &locale.decimal_separator.to_string(), 1)
    } else {
        text
    };
    format!("{}%", text)
}
