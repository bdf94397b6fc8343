// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use accademia::Catalog;
use accademia_domain::Member;
use accademia_persistence::Persistence;
use std::collections::BTreeMap;

use super::helpers::{
    create_test_admin, create_test_operator, create_test_persistence, seed_catalog, tier_id,
};
use crate::{
    ApiError, AuthenticatedActor, PromoteQuoteRequest, PromoteQuoteResponse, QuoteRequest,
    QuoteResponse, Role, UpdatePricingTierRequest, compute_quote, promote_quote,
    quote_from_member, update_pricing_tier,
};

fn set_tier(persistence: &mut Persistence, admin: &AuthenticatedActor, key: &str, value: &str) {
    let id: i64 = tier_id(persistence, key);
    update_pricing_tier(
        persistence,
        admin,
        id,
        UpdatePricingTierRequest {
            description: key.to_string(),
            value: value.to_string(),
        },
    )
    .unwrap();
}

/// Salsa as base, Bachata at 25% off, the first offer and the exhibition.
fn salsa_bachata_request() -> QuoteRequest {
    let mut discounts: BTreeMap<String, f64> = BTreeMap::new();
    discounts.insert(String::from("Bachata"), 25.0);
    QuoteRequest {
        base_course: Some(String::from("Salsa")),
        additional_courses: vec![String::from("Bachata")],
        discounts,
        extra_offers: [true, false, false, false],
        exhibition_selected: true,
        membership_type_id: Some(1),
    }
}

fn priced_persistence() -> (Persistence, AuthenticatedActor) {
    let mut persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedActor = create_test_admin(&mut persistence);
    seed_catalog(&mut persistence, &admin);
    set_tier(&mut persistence, &admin, "offer_1", "10%");
    set_tier(&mut persistence, &admin, "exhibition_fee", "15");
    set_tier(&mut persistence, &admin, "quarterly_discount", "5%");
    (persistence, admin)
}

#[test]
fn test_compute_quote_applies_discounts_offers_and_fees() {
    let (mut persistence, admin) = priced_persistence();

    let response: QuoteResponse =
        compute_quote(&mut persistence, &admin, &salsa_bachata_request()).unwrap();
    let breakdown = response.breakdown;

    assert!((breakdown.base_price - 60.0).abs() < f64::EPSILON);
    assert!((breakdown.subtotal_additional_discounted - 26.25).abs() < 1e-9);
    assert_eq!(breakdown.applied_offer, Some(0));
    assert!((breakdown.final_course_amount_rounded - 80.0).abs() < f64::EPSILON);
    assert!((breakdown.monthly_fee - 95.0).abs() < f64::EPSILON);
    assert!((breakdown.enrollment_fee - 30.0).abs() < f64::EPSILON);
    assert!((breakdown.quarterly_fee - 275.0).abs() < f64::EPSILON);
    assert!((breakdown.annual_fee - 855.0).abs() < f64::EPSILON);
}

fn quote_with_discount(discount: &serde_json::Value) -> QuoteRequest {
    serde_json::from_value(serde_json::json!({
        "base_course": "Salsa",
        "additional_courses": ["Bachata"],
        "discounts": { "Bachata": discount },
    }))
    .unwrap()
}

#[test]
fn test_typed_discounts_are_read_leniently() {
    let (mut persistence, admin) = priced_persistence();

    let blank: QuoteResponse = compute_quote(
        &mut persistence,
        &admin,
        &quote_with_discount(&serde_json::json!("")),
    )
    .unwrap();
    assert!(blank.breakdown.lines[0].discount_percent.abs() < f64::EPSILON);
    assert!((blank.breakdown.subtotal_additional_discounted - 35.0).abs() < 1e-9);

    let typed: QuoteResponse = compute_quote(
        &mut persistence,
        &admin,
        &quote_with_discount(&serde_json::json!("20")),
    )
    .unwrap();
    assert!((typed.breakdown.lines[0].discount_percent - 20.0).abs() < f64::EPSILON);
    assert!((typed.breakdown.subtotal_additional_discounted - 28.0).abs() < 1e-9);
}

#[test]
fn test_unreadable_discounts_count_as_zero() {
    for raw in [
        serde_json::json!("molto"),
        serde_json::json!(null),
        serde_json::json!(true),
    ] {
        let request: QuoteRequest = quote_with_discount(&raw);
        assert!(request.discounts["Bachata"].abs() < f64::EPSILON);
    }

    let percent: QuoteRequest = quote_with_discount(&serde_json::json!(" 12,5% "));
    assert!((percent.discounts["Bachata"] - 12.5).abs() < f64::EPSILON);
}

#[test]
fn test_base_course_is_not_also_additional() {
    let (mut persistence, admin) = priced_persistence();

    let request: QuoteRequest = QuoteRequest {
        base_course: Some(String::from("Salsa")),
        additional_courses: vec![String::from("Salsa"), String::from("Tango")],
        ..QuoteRequest::default()
    };
    let response: QuoteResponse = compute_quote(&mut persistence, &admin, &request).unwrap();

    assert_eq!(response.breakdown.lines.len(), 1);
    assert_eq!(response.breakdown.lines[0].course_name, "Tango");
    assert!((response.breakdown.subtotal_courses - 110.0).abs() < f64::EPSILON);
}

#[test]
fn test_empty_quote_is_zero() {
    let (mut persistence, admin) = priced_persistence();

    let response: QuoteResponse =
        compute_quote(&mut persistence, &admin, &QuoteRequest::default()).unwrap();

    assert!(response.breakdown.monthly_fee.abs() < f64::EPSILON);
    assert!(response.breakdown.annual_fee.abs() < f64::EPSILON);
    assert_eq!(response.breakdown.applied_offer, None);
}

#[test]
fn test_quote_from_member_restores_courses() {
    let (mut persistence, admin) = priced_persistence();

    let response: QuoteResponse = quote_from_member(&mut persistence, &admin, 1).unwrap();

    assert_eq!(response.breakdown.lines.len(), 1);
    assert_eq!(response.breakdown.lines[0].course_name, "Bachata");
    assert!((response.breakdown.base_price - 60.0).abs() < f64::EPSILON);
}

#[test]
fn test_quote_from_unknown_member_is_not_found() {
    let (mut persistence, admin) = priced_persistence();

    let result: Result<QuoteResponse, ApiError> = quote_from_member(&mut persistence, &admin, 99);

    assert!(
        matches!(result, Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Member")
    );
}

#[test]
fn test_promote_quote_updates_existing_member() {
    let (mut persistence, _admin) = priced_persistence();
    let (contributor, _) = create_test_operator(&mut persistence, "desk", Role::Contributor);

    let response: PromoteQuoteResponse = promote_quote(
        &mut persistence,
        &contributor,
        PromoteQuoteRequest {
            quote: salsa_bachata_request(),
            member_id: Some(2),
            member: None,
        },
    )
    .unwrap();

    assert_eq!(response.member_id, 2);
    assert_eq!(response.message, "Modifica - Soci: Luca Verdi");

    let catalog: Catalog = persistence.load_catalog().unwrap();
    let luca: &Member = &catalog.member(2).unwrap().record;
    assert_eq!(luca.base_course.as_deref(), Some("Salsa"));
    assert_eq!(luca.courses, vec![String::from("Bachata")]);
    assert!((luca.monthly_fee - 95.0).abs() < f64::EPSILON);
    assert!((luca.quarterly_fee - 275.0).abs() < f64::EPSILON);
    assert!((luca.exhibition_fee - 15.0).abs() < f64::EPSILON);
}

#[test]
fn test_promote_quote_creates_new_member() {
    let (mut persistence, admin) = priced_persistence();

    let response: PromoteQuoteResponse = promote_quote(
        &mut persistence,
        &admin,
        PromoteQuoteRequest {
            quote: salsa_bachata_request(),
            member_id: None,
            member: Some(Member::new("Anna", "Neri")),
        },
    )
    .unwrap();

    assert_eq!(response.member_id, 3);
    let catalog: Catalog = persistence.load_catalog().unwrap();
    let anna: &Member = &catalog.member(3).unwrap().record;
    assert!((anna.enrollment_fee - 30.0).abs() < f64::EPSILON);
    assert!((anna.annual_fee - 855.0).abs() < f64::EPSILON);
}

#[test]
fn test_promote_quote_requires_a_member() {
    let (mut persistence, admin) = priced_persistence();

    let result: Result<PromoteQuoteResponse, ApiError> = promote_quote(
        &mut persistence,
        &admin,
        PromoteQuoteRequest {
            quote: salsa_bachata_request(),
            member_id: None,
            member: None,
        },
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "member"));
}

#[test]
fn test_viewer_cannot_promote_quote() {
    let (mut persistence, _admin) = priced_persistence();
    let (viewer, _) = create_test_operator(&mut persistence, "guest", Role::Viewer);

    let result: Result<PromoteQuoteResponse, ApiError> = promote_quote(
        &mut persistence,
        &viewer,
        PromoteQuoteRequest {
            quote: salsa_bachata_request(),
            member_id: Some(1),
            member: None,
        },
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}
