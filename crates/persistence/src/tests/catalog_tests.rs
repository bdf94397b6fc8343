// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_course, seed_catalog};
use crate::{Persistence, PersistenceError, parse_timestamp};
use accademia::{Catalog, Change, EntityKind, Record};
use accademia_domain::{
    Member, Payment, PaymentKind, PricingSettings, Room, Stored, Teacher, TierKey,
};

#[test]
fn test_new_store_has_seeded_pricing_tiers() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let catalog: Catalog = persistence.load_catalog().unwrap();

    assert!(catalog.courses.is_empty());
    assert_eq!(catalog.pricing_tiers.len(), 9);
    let keys: Vec<&str> = catalog
        .pricing_tiers
        .iter()
        .map(|t| t.record.key.as_str())
        .collect();
    let expected: Vec<&str> = TierKey::ALL.iter().map(TierKey::as_str).collect();
    assert_eq!(keys, expected);

    let settings: PricingSettings = catalog.pricing_settings();
    assert_eq!(
        settings.get(TierKey::Payee).map(|e| e.description.as_str()),
        Some("Intestatario")
    );
}

#[test]
fn test_inserted_records_round_trip_with_stamps() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let ids: Vec<i64> = seed_catalog(&mut persistence);
    assert_eq!(ids.len(), 4);

    let catalog: Catalog = persistence.load_catalog().unwrap();
    let course: &Stored<accademia_domain::Course> = &catalog.courses[0];
    assert_eq!(course.id, ids[2]);
    assert_eq!(course.record, create_test_course("Salsa"));
    assert!(parse_timestamp(&course.created_at).is_some());
    assert_eq!(course.created_at, course.updated_at);

    assert_eq!(catalog.rooms[0].record, Room::new("Sala A", Some(25)));
    assert_eq!(catalog.members[0].record.base_course.as_deref(), Some("Salsa"));
    assert!(catalog.members[0].record.courses.is_empty());
}

#[test]
fn test_update_keeps_created_at_and_clears_optional_fields() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let ids: Vec<i64> = seed_catalog(&mut persistence);
    let before: Catalog = persistence.load_catalog().unwrap();

    let mut course = create_test_course("Salsa");
    course.category = None;
    course.base_price = 120.0;
    persistence
        .apply_changes(&[Change::Update {
            id: ids[2],
            record: Record::Course(course.clone()),
        }])
        .unwrap();

    let after: Catalog = persistence.load_catalog().unwrap();
    assert_eq!(after.courses[0].record, course);
    assert_eq!(after.courses[0].created_at, before.courses[0].created_at);
    assert!(after.courses[0].updated_at >= before.courses[0].updated_at);
}

#[test]
fn test_collections_are_stored_in_order() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed_catalog(&mut persistence);

    let teacher: Teacher = Teacher::new(
        "Marco",
        "Rossi",
        vec![String::from("Tango"), String::from("Salsa")],
    );
    let mut member: Member = Member::new("Anna", "Verdi");
    member.courses = vec![String::from("Tango"), String::from("Bachata")];
    member.fiscal_code = Some(String::from("  "));
    persistence
        .apply_changes(&[
            Change::Insert(Record::Teacher(teacher.clone())),
            Change::Insert(Record::Member(member)),
        ])
        .unwrap();

    let catalog: Catalog = persistence.load_catalog().unwrap();
    assert_eq!(catalog.teachers[0].record, teacher);
    // Ordered by last name: Bianchi, Verdi.
    let anna: &Member = &catalog.members[1].record;
    assert_eq!(anna.courses, vec!["Tango", "Bachata"]);
    assert_eq!(anna.fiscal_code, None);
}

#[test]
fn test_payments_load_with_kind() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let ids: Vec<i64> = seed_catalog(&mut persistence);

    let payment: Payment = Payment {
        member_id: ids[3],
        kind: PaymentKind::Quarterly,
        period_label: String::from("Ott-Dic 2025"),
        amount: 285.0,
        paid_on: String::from("01/10/2025"),
        method: None,
        notes: Some(String::from("contanti")),
    };
    persistence
        .apply_changes(&[Change::Insert(Record::Payment(payment.clone()))])
        .unwrap();

    let catalog: Catalog = persistence.load_catalog().unwrap();
    assert_eq!(catalog.payments.len(), 1);
    assert_eq!(catalog.payments[0].record, payment);
    assert_eq!(catalog.payments_of(ids[3]).len(), 1);
}

#[test]
fn test_delete_removes_row() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let ids: Vec<i64> = seed_catalog(&mut persistence);

    persistence
        .apply_changes(&[Change::Delete {
            kind: EntityKind::Room,
            id: ids[1],
        }])
        .unwrap();
    assert!(persistence.load_catalog().unwrap().rooms.is_empty());
}

#[test]
fn test_update_or_delete_of_missing_row_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let update = persistence.apply_changes(&[Change::Update {
        id: 42,
        record: Record::Room(Room::new("Sala Z", None)),
    }]);
    assert!(matches!(update, Err(PersistenceError::NotFound(_))));

    let delete = persistence.apply_changes(&[Change::Delete {
        kind: EntityKind::Course,
        id: 42,
    }]);
    assert!(matches!(delete, Err(PersistenceError::NotFound(_))));
}
