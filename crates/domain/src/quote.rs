// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Membership fee quoting.
//!
//! A quote starts from a base course, adds discounted additional courses,
//! optionally applies one extra offer and an exhibition fee, then derives
//! monthly, quarterly and annual totals. Malformed or missing inputs never
//! fail the computation; they contribute nothing.
//!
//! Rounding to the nearest 5 happens only where noted below, and uses
//! `f64::round` (ties away from zero). For the non-negative amounts that
//! occur in practice this matches the rounding of the legacy spreadsheet.

use crate::format::{parse_amount, parse_percent};
use crate::pricing::PricingSettings;
use crate::types::Course;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of months billed by the quarterly fee.
pub const QUARTER_MONTHS: f64 = 3.0;
/// Number of months billed by the annual (season) fee.
pub const SEASON_MONTHS: f64 = 9.0;

/// Extra offers are checked in this order; the first selected one wins.
pub const OFFER_PRIORITY: [usize; 4] = [0, 3, 1, 2];

/// Rounds to the nearest multiple of 5.
///
/// Non-finite input yields `0`.
#[must_use]
pub fn round_to_nearest_5(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value / 5.0).round() * 5.0
}

/// Clamps a discount percentage to `[0, 100]`; non-finite input becomes `0`.
#[must_use]
pub const fn clamp_discount(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Everything the engine needs to price a selection.
#[derive(Debug, Clone)]
pub struct QuoteInput<'a> {
    /// The base course, if one is selected.
    pub base_course: Option<&'a Course>,
    /// Additional courses in selection order.
    pub additional_courses: Vec<&'a Course>,
    /// Discount percentage per additional course, keyed by course name.
    pub discounts: &'a BTreeMap<String, f64>,
    pub pricing: &'a PricingSettings,
    /// Which of the four extra offers are ticked.
    pub extra_offers: [bool; 4],
    pub exhibition_selected: bool,
    /// Raw value of the selected membership type, if any.
    pub membership_value: Option<&'a str>,
}

/// Price contribution of one additional course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub course_name: String,
    pub additional_price: f64,
    /// Effective discount after clamping.
    pub discount_percent: f64,
    pub discounted_price: f64,
}

/// Every quantity derived while computing a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub base_price: f64,
    pub lines: Vec<QuoteLine>,
    pub subtotal_additional_raw: f64,
    pub subtotal_additional_discounted: f64,
    pub subtotal_courses: f64,
    /// Candidate final amount for each extra offer.
    pub offer_candidates: [f64; 4],
    /// Index of the offer that produced the final amount, if any.
    pub applied_offer: Option<usize>,
    pub final_course_amount: f64,
    pub final_course_amount_rounded: f64,
    pub exhibition_fee: f64,
    pub enrollment_fee: f64,
    pub monthly_fee: f64,
    pub quarterly_discount_factor: f64,
    pub quarterly_fee: f64,
    pub annual_discount_factor: f64,
    pub annual_fee: f64,
}

/// Computes a quote.
///
/// Quantities are derived in a fixed order:
///
/// 1. raw and discounted subtotals of the additional courses
/// 2. `subtotal_courses = base_price + discounted additional subtotal`
/// 3. one candidate per extra offer, using that offer's own percentage
/// 4. the final amount from the first ticked offer in priority 0, 3, 1, 2
/// 5. the rounded final amount, the exhibition and enrollment fees
/// 6. monthly, quarterly and annual fees
#[must_use]
pub fn compute_quote(input: &QuoteInput<'_>) -> QuoteBreakdown {
    let base_price: f64 = input
        .base_course
        .map_or(0.0, |course| finite_or_zero(course.base_price));

    let lines: Vec<QuoteLine> = input
        .additional_courses
        .iter()
        .map(|course| {
            let additional_price: f64 = finite_or_zero(course.additional_price);
            let discount_percent: f64 = clamp_discount(
                input
                    .discounts
                    .get(&course.name)
                    .copied()
                    .unwrap_or(0.0),
            );
            QuoteLine {
                course_name: course.name.clone(),
                additional_price,
                discount_percent,
                discounted_price: additional_price * (1.0 - discount_percent / 100.0),
            }
        })
        .collect();

    let subtotal_additional_raw: f64 = lines.iter().map(|l| l.additional_price).sum();
    let subtotal_additional_discounted: f64 = lines.iter().map(|l| l.discounted_price).sum();
    let subtotal_courses: f64 = base_price + subtotal_additional_discounted;

    let offer_candidates: [f64; 4] = std::array::from_fn(|index| {
        let percent: Option<f64> = input
            .pricing
            .offer(index)
            .and_then(|entry| parse_percent(&entry.value));
        match (index, percent) {
            (_, None) => subtotal_courses,
            (0 | 3, Some(p)) => subtotal_courses * (1.0 - p),
            (_, Some(p)) => base_price + subtotal_additional_discounted * (1.0 - p),
        }
    });

    let applied_offer: Option<usize> = OFFER_PRIORITY
        .into_iter()
        .find(|index| input.extra_offers[*index]);
    let final_course_amount: f64 =
        applied_offer.map_or(subtotal_courses, |index| offer_candidates[index]);
    let final_course_amount_rounded: f64 = round_to_nearest_5(final_course_amount);

    let exhibition_fee: f64 = if input.exhibition_selected {
        input
            .pricing
            .exhibition_fee
            .as_ref()
            .and_then(|entry| parse_amount(&entry.value))
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let enrollment_fee: f64 =
        round_to_nearest_5(input.membership_value.and_then(parse_amount).unwrap_or(0.0));

    let monthly_fee: f64 = round_to_nearest_5(final_course_amount_rounded + exhibition_fee);

    let quarterly_discount_factor: f64 = discount_factor(
        input
            .pricing
            .quarterly_discount
            .as_ref()
            .map(|e| e.value.as_str()),
    );
    let quarterly_fee: f64 = round_to_nearest_5(
        (monthly_fee - exhibition_fee) * QUARTER_MONTHS * quarterly_discount_factor
            + exhibition_fee * QUARTER_MONTHS,
    );

    let annual_discount_factor: f64 = discount_factor(
        input
            .pricing
            .annual_discount
            .as_ref()
            .map(|e| e.value.as_str()),
    );
    let annual_fee: f64 = round_to_nearest_5(
        (monthly_fee - exhibition_fee) * SEASON_MONTHS * annual_discount_factor
            + exhibition_fee * SEASON_MONTHS,
    );

    QuoteBreakdown {
        base_price,
        lines,
        subtotal_additional_raw,
        subtotal_additional_discounted,
        subtotal_courses,
        offer_candidates,
        applied_offer,
        final_course_amount,
        final_course_amount_rounded,
        exhibition_fee,
        enrollment_fee,
        monthly_fee,
        quarterly_discount_factor,
        quarterly_fee,
        annual_discount_factor,
        annual_fee,
    }
}

/// `1 - percent`, or `1` when the value is absent or not a percentage.
fn discount_factor(raw: Option<&str>) -> f64 {
    raw.and_then(parse_percent).map_or(1.0, |p| 1.0 - p)
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
