// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lookups of records that refer to other records by name.

use crate::token_list::contains_token;
use crate::types::{Course, Member, Stored, Teacher};

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Describes every member and teacher that refers to a course.
#[must_use]
pub fn course_dependents(
    course_name: &str,
    members: &[Stored<Member>],
    teachers: &[Stored<Teacher>],
) -> Vec<String> {
    let mut dependents: Vec<String> = members
        .iter()
        .filter(|m| {
            m.record
                .base_course
                .as_deref()
                .is_some_and(|base| same_name(base, course_name))
                || contains_token(&m.record.courses, course_name)
        })
        .map(|m| format!("member {}", m.record.full_name()))
        .collect();
    dependents.extend(
        teachers
            .iter()
            .filter(|t| contains_token(&t.record.disciplines, course_name))
            .map(|t| format!("teacher {}", t.record.full_name())),
    );
    dependents
}

/// Describes every course with a lesson in the room.
#[must_use]
pub fn room_dependents(room_name: &str, courses: &[Stored<Course>]) -> Vec<String> {
    courses
        .iter()
        .filter(|c| c.record.lessons.iter().any(|l| same_name(&l.room, room_name)))
        .map(|c| format!("course {}", c.record.name))
        .collect()
}

/// Describes every course in the category.
#[must_use]
pub fn category_dependents(category_name: &str, courses: &[Stored<Course>]) -> Vec<String> {
    courses
        .iter()
        .filter(|c| {
            c.record
                .category
                .as_deref()
                .is_some_and(|cat| same_name(cat, category_name))
        })
        .map(|c| format!("course {}", c.record.name))
        .collect()
}
