// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_catalog, member_with, stored};
use crate::{Catalog, QuoteSelection};
use accademia_domain::{Member, MembershipType, PricingTier, QuoteBreakdown};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_base_course_is_never_additional() {
    let mut selection: QuoteSelection = QuoteSelection::new();
    assert!(selection.add_additional("Salsa"));
    assert!(selection.add_additional("Bachata"));
    selection.set_discount("Salsa", 50.0);

    selection.select_base(Some("salsa"));
    assert_eq!(selection.base_course(), Some("salsa"));
    assert_eq!(selection.additional_courses(), ["Bachata"]);
    assert!(selection.discounts().is_empty());

    assert!(!selection.add_additional("SALSA"));
    assert!(!selection.add_additional(" Bachata "));
    assert!(!selection.add_additional("  "));
}

#[test]
fn test_discounts_are_clamped_and_limited_to_selected_courses() {
    let mut selection: QuoteSelection = QuoteSelection::new();
    selection.add_additional("Bachata");
    selection.set_discount("Bachata", 150.0);
    selection.set_discount("Tango", 10.0);
    assert_eq!(selection.discounts().get("Bachata"), Some(&100.0));
    assert_eq!(selection.discounts().get("Tango"), None);

    selection.set_discount("bachata", -5.0);
    assert_eq!(selection.discounts().get("Bachata"), Some(&0.0));

    selection.remove_additional("BACHATA");
    assert!(selection.additional_courses().is_empty());
    assert!(selection.discounts().is_empty());
}

#[test]
fn test_offer_toggles_ignore_out_of_range_indices() {
    let mut selection: QuoteSelection = QuoteSelection::new();
    selection.toggle_offer(2);
    selection.set_offer(7, true);
    assert_eq!(selection.extra_offers(), [false, false, true, false]);
    selection.toggle_offer(2);
    assert_eq!(selection.extra_offers(), [false; 4]);
}

#[test]
fn test_compute_against_catalog() {
    let catalog: Catalog = create_test_catalog();
    let mut selection: QuoteSelection = QuoteSelection::new();
    selection.select_base(Some("Salsa"));
    selection.add_additional("Bachata");
    selection.add_additional("Tango");
    selection.set_discount("Bachata", 20.0);
    selection.set_offer(1, true);
    selection.set_exhibition(true);
    selection.set_membership_type(Some(1));

    let quote: QuoteBreakdown = selection.compute(&catalog);

    assert!(approx(quote.base_price, 100.0));
    assert!(approx(quote.subtotal_additional_raw, 90.0));
    assert!(approx(quote.subtotal_additional_discounted, 80.0));
    assert!(approx(quote.subtotal_courses, 180.0));
    assert_eq!(quote.applied_offer, Some(1));
    // Second offer discounts only the additional courses.
    assert!(approx(quote.final_course_amount, 164.0));
    assert!(approx(quote.final_course_amount_rounded, 165.0));
    assert!(approx(quote.exhibition_fee, 15.0));
    assert!(approx(quote.enrollment_fee, 30.0));
    assert!(approx(quote.monthly_fee, 180.0));
    assert!(approx(quote.quarterly_fee, 515.0));
    assert!(approx(quote.annual_fee, 1470.0));
}

#[test]
fn test_compute_skips_courses_missing_from_catalog() {
    let catalog: Catalog = create_test_catalog();
    let mut selection: QuoteSelection = QuoteSelection::new();
    selection.select_base(Some("Flamenco"));
    selection.add_additional("Tango");
    selection.add_additional("Hip Hop");
    selection.set_membership_type(Some(99));

    let quote: QuoteBreakdown = selection.compute(&catalog);
    assert!(approx(quote.base_price, 0.0));
    assert_eq!(quote.lines.len(), 1);
    assert!(approx(quote.subtotal_courses, 40.0));
    assert!(approx(quote.enrollment_fee, 0.0));
    assert!(approx(quote.monthly_fee, 40.0));
}

#[test]
fn test_compute_uses_positional_pricing_when_keys_are_blank() {
    let mut catalog: Catalog = create_test_catalog();
    catalog.pricing_tiers = vec![
        stored(1, PricingTier::new(1, "", "Sconto 2", "20%")),
        stored(2, PricingTier::new(0, "", "Sconto 1", "10%")),
    ];
    let mut selection: QuoteSelection = QuoteSelection::new();
    selection.select_base(Some("Salsa"));
    selection.set_offer(0, true);

    let quote: QuoteBreakdown = selection.compute(&catalog);
    // Position 0 is the first offer, regardless of row order.
    assert!(approx(quote.final_course_amount, 90.0));
    assert!(approx(quote.exhibition_fee, 0.0));
}

#[test]
fn test_from_member_picks_first_matching_membership_type() {
    let catalog: Catalog = create_test_catalog();
    let mut member: Member = member_with(Some("salsa"), &["Bachata", "Flamenco"]);
    member.enrollment_fee = 30.0;
    member.exhibition_fee = 15.0;

    let selection: QuoteSelection = QuoteSelection::from_member(&member, &catalog);
    assert_eq!(selection.base_course(), Some("Salsa"));
    assert_eq!(selection.additional_courses(), ["Bachata"]);
    // "Ordinario" and "Promo" are both worth 30; the first wins.
    assert_eq!(selection.membership_type_id(), Some(1));
    assert!(selection.exhibition_selected());
    assert_eq!(selection.extra_offers(), [false; 4]);
    assert!(selection.discounts().is_empty());
}

#[test]
fn test_from_member_without_matching_fee_has_no_membership_type() {
    let catalog: Catalog = create_test_catalog();
    let mut member: Member = member_with(None, &[]);
    member.enrollment_fee = 22.5;

    let selection: QuoteSelection = QuoteSelection::from_member(&member, &catalog);
    assert_eq!(selection.base_course(), None);
    assert_eq!(selection.membership_type_id(), None);
    assert!(!selection.exhibition_selected());
}

#[test]
fn test_promote_into_writes_courses_and_fees() {
    let catalog: Catalog = create_test_catalog();
    let mut selection: QuoteSelection = QuoteSelection::new();
    selection.select_base(Some("Tango"));
    selection.add_additional("Salsa");
    selection.set_exhibition(true);
    selection.set_membership_type(Some(2));
    let quote: QuoteBreakdown = selection.compute(&catalog);

    let mut member: Member = member_with(Some("Salsa"), &["Bachata"]);
    selection.promote_into(&quote, &mut member);

    assert_eq!(member.base_course.as_deref(), Some("Tango"));
    assert_eq!(member.courses, vec!["Salsa"]);
    assert!(approx(member.enrollment_fee, 15.0));
    assert!(approx(member.exhibition_fee, 15.0));
    // 80 + 60 = 140, plus the exhibition fee.
    assert!(approx(member.monthly_fee, 155.0));
    assert!(approx(member.quarterly_fee, quote.quarterly_fee));
    assert!(approx(member.annual_fee, quote.annual_fee));

    let restored: QuoteSelection = QuoteSelection::from_member(&member, &catalog);
    assert_eq!(restored.base_course(), Some("Tango"));
    assert_eq!(restored.additional_courses(), ["Salsa"]);
    assert_eq!(restored.membership_type_id(), Some(2));
}

#[test]
fn test_membership_not_a_multiple_of_five_is_not_restored() {
    let mut catalog: Catalog = create_test_catalog();
    catalog.membership_types = vec![
        stored(1, MembershipType::new("Ordinario", "30")),
        stored(4, MembershipType::new("Sostenitore", "32")),
        stored(5, MembershipType::new("Famiglia", "33")),
    ];

    let promoted_with = |membership_type_id: i64| -> QuoteSelection {
        let mut selection: QuoteSelection = QuoteSelection::new();
        selection.set_membership_type(Some(membership_type_id));
        let quote: QuoteBreakdown = selection.compute(&catalog);
        let mut member: Member = member_with(None, &[]);
        selection.promote_into(&quote, &mut member);
        QuoteSelection::from_member(&member, &catalog)
    };

    // 32 is stored as 30 and comes back as the type worth 30.
    assert_eq!(promoted_with(4).membership_type_id(), Some(1));
    // 33 is stored as 35, which no type is worth.
    assert_eq!(promoted_with(5).membership_type_id(), None);
    assert_eq!(promoted_with(1).membership_type_id(), Some(1));
}
