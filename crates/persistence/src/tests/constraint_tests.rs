// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_course, seed_catalog};
use crate::{Persistence, PersistenceError};
use accademia::{Catalog, Change, EntityKind, Record};
use accademia_domain::{Category, Member, Payment, PaymentKind, Room};

fn payment_for(member_id: i64) -> Payment {
    Payment {
        member_id,
        kind: PaymentKind::Monthly,
        period_label: String::from("Ottobre 2025"),
        amount: 60.0,
        paid_on: String::from("05/10/2025"),
        method: None,
        notes: None,
    }
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_duplicate_name_reports_unique_code() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    seed_catalog(&mut persistence);

    let err: PersistenceError = persistence
        .apply_changes(&[Change::Insert(Record::Category(Category::new(
            "LATINO", "#000000",
        )))])
        .unwrap_err();
    assert!(matches!(err, PersistenceError::UniqueViolation(_)));
    assert_eq!(err.code(), Some("23505"));
}

#[test]
fn test_duplicate_fiscal_code_reports_unique_code() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let mut first: Member = Member::new("Giulia", "Bianchi");
    first.fiscal_code = Some(String::from("BNCGLI90A41H501X"));
    let mut second: Member = Member::new("Giulia", "Bianchi");
    second.fiscal_code = Some(String::from("bncgli90a41h501x"));

    persistence
        .apply_changes(&[Change::Insert(Record::Member(first))])
        .unwrap();
    let err: PersistenceError = persistence
        .apply_changes(&[Change::Insert(Record::Member(second))])
        .unwrap_err();
    assert_eq!(err.code(), Some("23505"));
}

#[test]
fn test_payment_for_missing_member_reports_foreign_key_code() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let err: PersistenceError = persistence
        .apply_changes(&[Change::Insert(Record::Payment(payment_for(999)))])
        .unwrap_err();
    assert!(matches!(err, PersistenceError::ForeignKeyViolation(_)));
    assert_eq!(err.code(), Some("23503"));
}

#[test]
fn test_member_with_payments_cannot_be_deleted() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let ids: Vec<i64> = seed_catalog(&mut persistence);
    persistence
        .apply_changes(&[Change::Insert(Record::Payment(payment_for(ids[3])))])
        .unwrap();

    let err: PersistenceError = persistence
        .apply_changes(&[Change::Delete {
            kind: EntityKind::Member,
            id: ids[3],
        }])
        .unwrap_err();
    assert_eq!(err.code(), Some("23503"));
    assert_eq!(persistence.load_catalog().unwrap().members.len(), 1);
}

#[test]
fn test_failed_change_set_rolls_back_every_write() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let ids: Vec<i64> = seed_catalog(&mut persistence);

    let result = persistence.apply_changes(&[
        Change::Update {
            id: ids[2],
            record: Record::Course(create_test_course("Salsa Cubana")),
        },
        Change::Insert(Record::Course(create_test_course("Kizomba"))),
        Change::Insert(Record::Category(Category::new("Latino", "#000000"))),
    ]);
    assert!(result.is_err());

    let catalog: Catalog = persistence.load_catalog().unwrap();
    let names: Vec<&str> = catalog
        .courses
        .iter()
        .map(|c| c.record.name.as_str())
        .collect();
    assert_eq!(names, vec!["Salsa"]);
}

#[test]
fn test_oversized_room_capacity_is_refused_not_nulled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let err: PersistenceError = persistence
        .apply_changes(&[Change::Insert(Record::Room(Room::new(
            "Sala Grande",
            Some(u32::MAX),
        )))])
        .unwrap_err();

    assert!(matches!(err, PersistenceError::SerializationError(_)));
    assert!(persistence.load_catalog().unwrap().rooms.is_empty());
}

#[test]
fn test_non_constraint_errors_have_no_code() {
    assert_eq!(PersistenceError::NotFound(String::from("x")).code(), None);
    assert_eq!(PersistenceError::DatabaseError(String::from("x")).code(), None);
}
