// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Catalog;
use accademia_audit::Actor;
use accademia_domain::{
    Category, Course, Lesson, Member, MembershipType, PricingTier, Room, Stored, Teacher,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("Segreteria"), String::from("Admin"))
}

pub fn stored<T>(id: i64, record: T) -> Stored<T> {
    Stored::new(
        id,
        String::from("2025-09-01T09:00:00Z"),
        String::from("2025-09-01T09:00:00Z"),
        record,
    )
}

pub fn course(name: &str, base_price: f64, additional_price: f64) -> Course {
    let mut course: Course = Course::new(name, base_price, additional_price);
    course.category = Some(String::from("Latino"));
    course
        .lessons
        .push(Lesson::new("Lunedì", "Sala A", "20:00-21:00"));
    course
}

pub fn member_with(base: Option<&str>, courses: &[&str]) -> Member {
    let mut member: Member = Member::new("Giulia", "Bianchi");
    member.base_course = base.map(ToString::to_string);
    member.courses = courses.iter().map(ToString::to_string).collect();
    member
}

/// A catalog with three courses, one member, one teacher and full pricing.
pub fn create_test_catalog() -> Catalog {
    let mut catalog: Catalog = Catalog::new();
    catalog.categories = vec![
        stored(1, Category::new("Latino", "#FF8800")),
        stored(2, Category::new("Classico", "#3366CC")),
    ];
    catalog.rooms = vec![
        stored(1, Room::new("Sala A", Some(25))),
        stored(2, Room::new("Sala B", Some(12))),
    ];
    catalog.courses = vec![
        stored(1, course("Salsa", 100.0, 60.0)),
        stored(2, course("Bachata", 90.0, 50.0)),
        stored(3, course("Tango", 80.0, 40.0)),
    ];
    catalog.members = vec![stored(1, member_with(Some("Salsa"), &["Bachata"]))];
    catalog.teachers = vec![stored(
        1,
        Teacher::new(
            "Marco",
            "Rossi",
            vec![String::from("Salsa"), String::from("Tango")],
        ),
    )];
    catalog.membership_types = vec![
        stored(1, MembershipType::new("Ordinario", "30")),
        stored(2, MembershipType::new("Ridotto", "15")),
        stored(3, MembershipType::new("Promo", "30,00")),
    ];
    catalog.pricing_tiers = vec![
        stored(1, PricingTier::new(0, "offer_1", "Fratelli", "10%")),
        stored(2, PricingTier::new(1, "offer_2", "Secondo corso", "20%")),
        stored(3, PricingTier::new(2, "offer_3", "Terzo corso", "30%")),
        stored(4, PricingTier::new(3, "offer_4", "Promo", "40%")),
        stored(5, PricingTier::new(4, "exhibition_fee", "Quota saggio", "15")),
        stored(6, PricingTier::new(5, "quarterly_discount", "Trimestrale", "5%")),
        stored(7, PricingTier::new(6, "annual_discount", "Annuale", "10%")),
        stored(8, PricingTier::new(7, "iban", "IBAN", "IT60X0542811101000000123456")),
        stored(9, PricingTier::new(8, "payee", "Intestatario", "ASD Accademia")),
    ];
    catalog
}
