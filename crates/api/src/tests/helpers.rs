// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use accademia_persistence::{OperatorData, Persistence};
use serde_json::{Value, json};

use crate::{AuthenticatedActor, Role, Section, create_record};

pub const TEST_PASSWORD: &str = "Passo-Doble-2026";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// Stores an operator and returns it together with its actor.
pub fn create_test_operator(
    persistence: &mut Persistence,
    login_name: &str,
    role: Role,
) -> (AuthenticatedActor, OperatorData) {
    let operator_id: i64 = persistence
        .create_operator(
            login_name,
            &format!("Operatore {login_name}"),
            TEST_PASSWORD,
            role.as_str(),
        )
        .unwrap();
    let operator: OperatorData = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    let actor: AuthenticatedActor = AuthenticatedActor::from_operator(&operator).unwrap();
    (actor, operator)
}

pub fn create_test_admin(persistence: &mut Persistence) -> AuthenticatedActor {
    create_test_operator(persistence, "admin", Role::Admin).0
}

pub fn course_json(name: &str, base_price: f64, additional_price: f64) -> Value {
    json!({
        "name": name,
        "category": "Latino",
        "base_price": base_price,
        "additional_price": additional_price,
        "weekly_hours": 1.5,
        "lessons": [{ "weekday": "Lunedì", "room": "Sala A", "time_range": "20:00-21:30" }],
    })
}

pub fn member_json(first_name: &str, last_name: &str, base_course: &str, courses: &[&str]) -> Value {
    json!({
        "first_name": first_name,
        "last_name": last_name,
        "base_course": base_course,
        "courses": courses,
        "enrollment_fee": 30.0,
        "monthly_fee": 90.0,
        "quarterly_fee": 0.0,
        "annual_fee": 0.0,
        "exhibition_fee": 0.0,
    })
}

/// Creates the catalog most tests start from.
///
/// - category 1 Latino, room 1 Sala A
/// - courses 1 Salsa (60/40), 2 Bachata (55/35), 3 Tango (70/50)
/// - membership types 1 Ordinario (30), 2 Ridotto (15)
/// - members 1 Giulia Bianchi (Salsa + Bachata), 2 Luca Verdi (Tango)
pub fn seed_catalog(persistence: &mut Persistence, admin: &AuthenticatedActor) {
    let mut tango: Value = course_json("Tango", 70.0, 50.0);
    tango["category"] = Value::Null;

    let records: Vec<(Section, Value)> = vec![
        (
            Section::Categories,
            json!({ "name": "Latino", "color_hex": "#FF8800" }),
        ),
        (Section::Rooms, json!({ "name": "Sala A", "capacity": 25 })),
        (Section::Courses, course_json("Salsa", 60.0, 40.0)),
        (Section::Courses, course_json("Bachata", 55.0, 35.0)),
        (Section::Courses, tango),
        (
            Section::MembershipTypes,
            json!({ "name": "Ordinario", "value": "30" }),
        ),
        (
            Section::MembershipTypes,
            json!({ "name": "Ridotto", "value": "15" }),
        ),
        (
            Section::Members,
            member_json("Giulia", "Bianchi", "Salsa", &["Bachata"]),
        ),
        (Section::Members, member_json("Luca", "Verdi", "Tango", &[])),
    ];
    for (section, payload) in records {
        create_record(persistence, admin, section, payload).unwrap();
    }
}

/// The id of the pricing entry with the given key.
pub fn tier_id(persistence: &mut Persistence, key: &str) -> i64 {
    persistence
        .load_catalog()
        .unwrap()
        .pricing_tiers
        .iter()
        .find(|tier| tier.record.key == key)
        .unwrap()
        .id
}
