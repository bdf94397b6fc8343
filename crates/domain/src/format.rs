// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Currency, amount and date helpers shared by every screen.
//!
//! Amounts are shown Italian style (`€ 1.234,50`). Parsing is lenient:
//! stored values were typed by hand over many seasons and mix decimal
//! commas, decimal points and currency symbols.

use num_traits::ToPrimitive;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[day]/[month]/[year]");
const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year] - [hour]:[minute]");
const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const ISO_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const ISO_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const ISO_FRACTION: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Formats an amount with thousands dots and a decimal comma, e.g. `1.234,50`.
///
/// Non-finite values are shown as `0,00`.
#[must_use]
pub fn format_price(amount: f64) -> String {
    let amount: f64 = if amount.is_finite() { amount } else { 0.0 };
    let cents: u64 = (amount.abs() * 100.0).round().to_u64().unwrap_or(0);
    let whole: u64 = cents / 100;
    let fraction: u64 = cents % 100;

    let digits: String = whole.to_string();
    let mut grouped: String = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign: &str = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02}")
}

/// Formats an amount as euros, e.g. `€ 1.234,50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("€ {}", format_price(amount))
}

/// Parses a hand-typed amount.
///
/// Accepts an optional `€` prefix, decimal points or commas and thousands
/// separators in either convention. When both separators appear the last
/// one is the decimal separator.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('€')
        .trim_end_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last_dot: Option<usize> = cleaned.rfind('.');
    let last_comma: Option<usize> = cleaned.rfind(',');
    let normalized: String = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a percentage such as `"15%"` into a fraction (`0.15`).
///
/// The trailing `%` is optional. Returns `None` for anything that is not
/// a number.
#[must_use]
pub fn parse_percent(raw: &str) -> Option<f64> {
    let trimmed: &str = raw.trim();
    let number: &str = trimmed.strip_suffix('%').unwrap_or(trimmed);
    parse_amount(number).map(|value| value / 100.0)
}

/// Formats a date as `dd/mm/yyyy`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

/// Formats a date and time as `dd/mm/yyyy - hh:mm`.
#[must_use]
pub fn format_datetime(datetime: PrimitiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).unwrap_or_default()
}

/// Parses the date shapes found in stored records and table cells.
///
/// Recognised forms are `dd/mm/yyyy`, `dd/mm/yyyy - hh:mm`,
/// `yyyy-mm-dd`, `yyyy-mm-ddThh:mm[:ss[.fff]]` and RFC 3339 timestamps
/// (converted to UTC). Date-only forms resolve to midnight.
#[must_use]
pub fn parse_date_loose(raw: &str) -> Option<PrimitiveDateTime> {
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(datetime) = PrimitiveDateTime::parse(trimmed, DATETIME_FORMAT) {
        return Some(datetime);
    }
    if let Ok(date) = Date::parse(trimmed, DATE_FORMAT) {
        return Some(date.with_time(Time::MIDNIGHT));
    }
    if let Ok(date) = Date::parse(trimmed, ISO_DATE) {
        return Some(date.with_time(Time::MIDNIGHT));
    }
    for format in [ISO_MINUTES, ISO_SECONDS, ISO_FRACTION] {
        if let Ok(datetime) = PrimitiveDateTime::parse(trimmed, format) {
            return Some(datetime);
        }
    }
    OffsetDateTime::parse(trimmed, &Rfc3339).ok().map(|dt| {
        let utc: OffsetDateTime = dt.to_offset(UtcOffset::UTC);
        PrimitiveDateTime::new(utc.date(), utc.time())
    })
}

/// Renders a stored date value for display, falling back to the raw text.
#[must_use]
pub fn display_date(raw: &str) -> String {
    parse_date_loose(raw).map_or_else(|| raw.to_string(), |dt| format_date(dt.date()))
}

/// Renders a stored timestamp for display, falling back to the raw text.
#[must_use]
pub fn display_datetime(raw: &str) -> String {
    parse_date_loose(raw).map_or_else(|| raw.to_string(), format_datetime)
}
