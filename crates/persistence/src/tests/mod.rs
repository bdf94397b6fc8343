// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod catalog_tests;
mod constraint_tests;

use accademia::{Change, Record};
use accademia_audit::Actor;
use accademia_domain::{Category, Course, Lesson, Member, Room};

use crate::Persistence;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("Segreteria"), String::from("Admin"))
}

pub fn create_test_course(name: &str) -> Course {
    let mut course: Course = Course::new(name, 100.0, 60.0);
    course.category = Some(String::from("Latino"));
    course.weekly_hours = 1.5;
    course
        .lessons
        .push(Lesson::new("Lunedì", "Sala A", "20:00-21:30"));
    course
}

/// Inserts a category, a room, a course and a member; returns their ids.
pub fn seed_catalog(persistence: &mut Persistence) -> Vec<i64> {
    let mut member: Member = Member::new("Giulia", "Bianchi");
    member.base_course = Some(String::from("Salsa"));
    member.monthly_fee = 100.0;

    persistence
        .apply_changes(&[
            Change::Insert(Record::Category(Category::new("Latino", "#FF8800"))),
            Change::Insert(Record::Room(Room::new("Sala A", Some(25)))),
            Change::Insert(Record::Course(create_test_course("Salsa"))),
            Change::Insert(Record::Member(member)),
        ])
        .unwrap()
}
