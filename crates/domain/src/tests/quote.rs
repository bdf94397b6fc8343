// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Course, PricingSettings, PricingTier, QuoteBreakdown, QuoteInput, clamp_discount,
    compute_quote, round_to_nearest_5,
};
use std::collections::BTreeMap;

fn classica() -> Course {
    Course::new("Danza Classica", 100.0, 60.0)
}

fn hip_hop() -> Course {
    Course::new("Hip Hop", 80.0, 50.0)
}

fn full_pricing() -> PricingSettings {
    PricingSettings::from_tiers(&[
        PricingTier::new(0, "offer_1", "Fratelli", "10%"),
        PricingTier::new(1, "offer_2", "Secondo corso", "20%"),
        PricingTier::new(2, "offer_3", "Terzo corso", "30%"),
        PricingTier::new(3, "offer_4", "Promo", "40%"),
        PricingTier::new(4, "exhibition_fee", "Quota saggio", "15"),
        PricingTier::new(5, "quarterly_discount", "Trimestrale", "5%"),
        PricingTier::new(6, "annual_discount", "Annuale", "10%"),
        PricingTier::new(7, "iban", "IBAN", "IT60X0542811101000000123456"),
        PricingTier::new(8, "payee", "Intestatario", "ASD Accademia"),
    ])
}

fn discounts(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(name, pct)| ((*name).to_string(), *pct))
        .collect()
}

fn quote(
    base: Option<&Course>,
    additional: &[&Course],
    discounts: &BTreeMap<String, f64>,
    pricing: &PricingSettings,
    extra_offers: [bool; 4],
    exhibition_selected: bool,
) -> QuoteBreakdown {
    compute_quote(&QuoteInput {
        base_course: base,
        additional_courses: additional.to_vec(),
        discounts,
        pricing,
        extra_offers,
        exhibition_selected,
        membership_value: None,
    })
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_round_to_nearest_5() {
    assert_eq!(round_to_nearest_5(0.0), 0.0);
    assert_eq!(round_to_nearest_5(126.0), 125.0);
    assert_eq!(round_to_nearest_5(127.5), 130.0);
    assert_eq!(round_to_nearest_5(2.5), 5.0);
    assert_eq!(round_to_nearest_5(-2.5), -5.0);
    assert_eq!(round_to_nearest_5(f64::NAN), 0.0);
    assert_eq!(round_to_nearest_5(f64::INFINITY), 0.0);
}

#[test]
fn test_round_to_nearest_5_is_idempotent() {
    for x in [-17.3, -2.5, 0.0, 0.1, 2.4999, 2.5, 7.5, 126.0, 1234.56, 99_999.99] {
        let once: f64 = round_to_nearest_5(x);
        assert_eq!(round_to_nearest_5(once), once, "not idempotent for {x}");
    }
}

#[test]
fn test_clamp_discount() {
    assert_eq!(clamp_discount(150.0), 100.0);
    assert_eq!(clamp_discount(-10.0), 0.0);
    assert_eq!(clamp_discount(35.0), 35.0);
    assert_eq!(clamp_discount(f64::NAN), 0.0);
}

#[test]
fn test_default_path_without_offers() {
    let base: Course = classica();
    let extra: Course = hip_hop();
    let d: BTreeMap<String, f64> = discounts(&[("Hip Hop", 20.0)]);
    let breakdown: QuoteBreakdown = quote(
        Some(&base),
        &[&extra],
        &d,
        &PricingSettings::default(),
        [false; 4],
        false,
    );

    assert_close(breakdown.subtotal_additional_raw, 50.0);
    assert_close(breakdown.subtotal_additional_discounted, 40.0);
    assert_close(breakdown.subtotal_courses, 140.0);
    assert_close(breakdown.final_course_amount, 140.0);
    assert_eq!(breakdown.applied_offer, None);
    assert_eq!(breakdown.final_course_amount_rounded, 140.0);
    assert_eq!(breakdown.monthly_fee, 140.0);
    assert_eq!(breakdown.exhibition_fee, 0.0);
    assert_eq!(breakdown.quarterly_fee, 420.0);
    assert_eq!(breakdown.annual_fee, 1260.0);
}

#[test]
fn test_first_offer_applies_its_own_percentage() {
    let base: Course = classica();
    let extra: Course = hip_hop();
    let d: BTreeMap<String, f64> = discounts(&[("Hip Hop", 20.0)]);
    let pricing: PricingSettings =
        PricingSettings::from_tiers(&[PricingTier::new(0, "offer_1", "Fratelli", "10%")]);
    let breakdown: QuoteBreakdown =
        quote(Some(&base), &[&extra], &d, &pricing, [true, false, false, false], false);

    assert_close(breakdown.final_course_amount, 126.0);
    assert_eq!(breakdown.final_course_amount_rounded, 125.0);
    assert_eq!(breakdown.monthly_fee, 125.0);
    assert_eq!(breakdown.applied_offer, Some(0));
}

#[test]
fn test_second_and_third_offers_discount_only_additional_courses() {
    let base: Course = classica();
    let extra: Course = hip_hop();
    let d: BTreeMap<String, f64> = discounts(&[("Hip Hop", 20.0)]);
    let breakdown: QuoteBreakdown = quote(
        Some(&base),
        &[&extra],
        &d,
        &full_pricing(),
        [false; 4],
        false,
    );

    assert_close(breakdown.offer_candidates[0], 126.0);
    assert_close(breakdown.offer_candidates[1], 132.0);
    assert_close(breakdown.offer_candidates[2], 128.0);
    assert_close(breakdown.offer_candidates[3], 84.0);
}

#[test]
fn test_offer_priority_is_zero_three_one_two() {
    let base: Course = classica();
    let extra: Course = hip_hop();
    let d: BTreeMap<String, f64> = discounts(&[("Hip Hop", 20.0)]);
    let pricing: PricingSettings = full_pricing();

    let only_first: QuoteBreakdown =
        quote(Some(&base), &[&extra], &d, &pricing, [true, false, false, false], false);
    let first_and_second: QuoteBreakdown =
        quote(Some(&base), &[&extra], &d, &pricing, [true, true, false, false], false);
    assert_eq!(only_first, first_and_second);

    let second_and_fourth: QuoteBreakdown =
        quote(Some(&base), &[&extra], &d, &pricing, [false, true, false, true], false);
    assert_eq!(second_and_fourth.applied_offer, Some(3));
    assert_eq!(second_and_fourth.final_course_amount_rounded, 85.0);

    let second_and_third: QuoteBreakdown =
        quote(Some(&base), &[&extra], &d, &pricing, [false, true, true, false], false);
    assert_eq!(second_and_third.applied_offer, Some(1));
    assert_eq!(second_and_third.final_course_amount_rounded, 130.0);
}

#[test]
fn test_unparseable_or_missing_offer_falls_back_to_subtotal() {
    let base: Course = classica();
    let d: BTreeMap<String, f64> = BTreeMap::new();
    let pricing: PricingSettings =
        PricingSettings::from_tiers(&[PricingTier::new(0, "offer_1", "Omaggio", "gratis")]);

    let unparseable: QuoteBreakdown =
        quote(Some(&base), &[], &d, &pricing, [true, false, false, false], false);
    assert_eq!(unparseable.final_course_amount, 100.0);

    let missing: QuoteBreakdown = quote(
        Some(&base),
        &[],
        &d,
        &PricingSettings::default(),
        [false, false, true, false],
        false,
    );
    assert_eq!(missing.final_course_amount, 100.0);
}

#[test]
fn test_discounts_outside_range_are_clamped() {
    let base: Course = classica();
    let extra: Course = hip_hop();

    let over: QuoteBreakdown = quote(
        Some(&base),
        &[&extra],
        &discounts(&[("Hip Hop", 150.0)]),
        &PricingSettings::default(),
        [false; 4],
        false,
    );
    let full: QuoteBreakdown = quote(
        Some(&base),
        &[&extra],
        &discounts(&[("Hip Hop", 100.0)]),
        &PricingSettings::default(),
        [false; 4],
        false,
    );
    assert_eq!(over, full);
    assert_eq!(over.subtotal_courses, 100.0);

    let under: QuoteBreakdown = quote(
        Some(&base),
        &[&extra],
        &discounts(&[("Hip Hop", -10.0)]),
        &PricingSettings::default(),
        [false; 4],
        false,
    );
    assert_eq!(under.lines[0].discount_percent, 0.0);
    assert_eq!(under.subtotal_courses, 150.0);
}

#[test]
fn test_exhibition_fee_and_seasonal_discounts() {
    let base: Course = classica();
    let extra: Course = hip_hop();
    let d: BTreeMap<String, f64> = discounts(&[("Hip Hop", 20.0)]);
    let breakdown: QuoteBreakdown =
        quote(Some(&base), &[&extra], &d, &full_pricing(), [false; 4], true);

    assert_eq!(breakdown.exhibition_fee, 15.0);
    assert_eq!(breakdown.monthly_fee, 155.0);

    let expected_quarterly: f64 = round_to_nearest_5(
        (breakdown.monthly_fee - breakdown.exhibition_fee) * 3.0 * (1.0 - 0.05)
            + breakdown.exhibition_fee * 3.0,
    );
    let expected_annual: f64 = round_to_nearest_5(
        (breakdown.monthly_fee - breakdown.exhibition_fee) * 9.0 * (1.0 - 0.10)
            + breakdown.exhibition_fee * 9.0,
    );
    assert_eq!(breakdown.quarterly_fee, expected_quarterly);
    assert_eq!(breakdown.annual_fee, expected_annual);
    assert_eq!(breakdown.quarterly_fee, 445.0);
    assert_eq!(breakdown.annual_fee, 1270.0);
}

#[test]
fn test_exhibition_fee_absent_tier_contributes_nothing() {
    let base: Course = classica();
    let d: BTreeMap<String, f64> = BTreeMap::new();
    let breakdown: QuoteBreakdown =
        quote(Some(&base), &[], &d, &PricingSettings::default(), [false; 4], true);
    assert_eq!(breakdown.exhibition_fee, 0.0);
    assert_eq!(breakdown.monthly_fee, 100.0);
    assert_eq!(breakdown.quarterly_discount_factor, 1.0);
    assert_eq!(breakdown.annual_discount_factor, 1.0);
}

#[test]
fn test_enrollment_fee_is_rounded_and_defaults_to_zero() {
    let d: BTreeMap<String, f64> = BTreeMap::new();
    let pricing: PricingSettings = PricingSettings::default();
    let mut input: QuoteInput<'_> = QuoteInput {
        base_course: None,
        additional_courses: Vec::new(),
        discounts: &d,
        pricing: &pricing,
        extra_offers: [false; 4],
        exhibition_selected: false,
        membership_value: Some("32,50"),
    };
    assert_eq!(compute_quote(&input).enrollment_fee, 35.0);

    input.membership_value = Some("non numerico");
    assert_eq!(compute_quote(&input).enrollment_fee, 0.0);

    input.membership_value = None;
    let empty: QuoteBreakdown = compute_quote(&input);
    assert_eq!(empty.enrollment_fee, 0.0);
    assert_eq!(empty.monthly_fee, 0.0);
    assert_eq!(empty.annual_fee, 0.0);
}

#[test]
fn test_missing_base_course_contributes_zero() {
    let extra: Course = hip_hop();
    let d: BTreeMap<String, f64> = discounts(&[("Hip Hop", 20.0)]);
    let breakdown: QuoteBreakdown =
        quote(None, &[&extra], &d, &PricingSettings::default(), [false; 4], false);
    assert_eq!(breakdown.base_price, 0.0);
    assert_close(breakdown.subtotal_courses, 40.0);
}
