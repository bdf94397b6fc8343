// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{course, create_test_actor, create_test_catalog, member_with, stored};
use crate::{Catalog, Change, Command, CoreError, EntityKind, Record, Transition, apply};
use accademia_domain::{Category, Course, Room};

#[test]
fn test_course_rename_updates_members_and_teachers_in_one_transition() {
    let mut catalog: Catalog = create_test_catalog();
    catalog
        .members
        .push(stored(2, member_with(Some("Tango"), &["Salsa", "Bachata"])));

    let result: Transition = apply(
        &catalog,
        Command::UpdateCourse {
            id: 1,
            course: course("Salsa Cubana", 100.0, 60.0),
        },
        create_test_actor(),
    )
    .unwrap();

    assert_eq!(result.changes.len(), 4);
    assert!(matches!(
        &result.changes[0],
        Change::Update { id: 1, record: Record::Course(c) } if c.name == "Salsa Cubana"
    ));
    assert!(matches!(
        &result.changes[1],
        Change::Update { id: 1, record: Record::Member(m) }
            if m.base_course.as_deref() == Some("Salsa Cubana") && m.courses == vec!["Bachata"]
    ));
    assert!(matches!(
        &result.changes[2],
        Change::Update { id: 2, record: Record::Member(m) }
            if m.base_course.as_deref() == Some("Tango")
                && m.courses == vec!["Salsa Cubana", "Bachata"]
    ));
    assert!(matches!(
        &result.changes[3],
        Change::Update { id: 1, record: Record::Teacher(t) }
            if t.disciplines == vec!["Salsa Cubana", "Tango"]
    ));
}

#[test]
fn test_room_rename_updates_lessons() {
    let catalog: Catalog = create_test_catalog();
    let result: Transition = apply(
        &catalog,
        Command::UpdateRoom {
            id: 1,
            room: Room::new("Sala Grande", Some(30)),
        },
        create_test_actor(),
    )
    .unwrap();

    // The room itself plus the three courses holding lessons in it.
    assert_eq!(result.changes.len(), 4);
    for change in &result.changes[1..] {
        match change {
            Change::Update {
                record: Record::Course(course),
                ..
            } => assert!(course.lessons.iter().all(|l| l.room == "Sala Grande")),
            other => panic!("unexpected change {other:?}"),
        }
    }
}

#[test]
fn test_category_rename_updates_courses() {
    let catalog: Catalog = create_test_catalog();
    let result: Transition = apply(
        &catalog,
        Command::UpdateCategory {
            id: 1,
            category: Category::new("Caraibico", "#FF8800"),
        },
        create_test_actor(),
    )
    .unwrap();
    let renamed: Vec<&Course> = result
        .changes
        .iter()
        .filter_map(|c| match c {
            Change::Update {
                record: Record::Course(course),
                ..
            } => Some(course),
            _ => None,
        })
        .collect();
    assert_eq!(renamed.len(), 3);
    assert!(
        renamed
            .iter()
            .all(|c| c.category.as_deref() == Some("Caraibico"))
    );
}

#[test]
fn test_delete_referenced_course_lists_dependents() {
    let catalog: Catalog = create_test_catalog();
    let result = apply(&catalog, Command::DeleteCourse { id: 1 }, create_test_actor());
    assert_eq!(
        result,
        Err(CoreError::StillReferenced {
            kind: EntityKind::Course,
            name: String::from("Salsa"),
            dependents: vec![
                String::from("member Giulia Bianchi"),
                String::from("teacher Marco Rossi"),
            ],
        })
    );
}

#[test]
fn test_delete_referenced_room_and_category_is_blocked() {
    let catalog: Catalog = create_test_catalog();
    assert!(matches!(
        apply(&catalog, Command::DeleteRoom { id: 1 }, create_test_actor()),
        Err(CoreError::StillReferenced { .. })
    ));
    assert!(matches!(
        apply(&catalog, Command::DeleteCategory { id: 1 }, create_test_actor()),
        Err(CoreError::StillReferenced { .. })
    ));
    assert!(apply(&catalog, Command::DeleteCategory { id: 2 }, create_test_actor()).is_ok());
}

#[test]
fn test_delete_unreferenced_course() {
    let mut catalog: Catalog = create_test_catalog();
    catalog.teachers.clear();
    let result = apply(&catalog, Command::DeleteCourse { id: 3 }, create_test_actor());
    assert!(result.is_ok());
}
