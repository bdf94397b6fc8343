// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::format::parse_amount;
use serde::{Deserialize, Serialize};

/// A persisted record together with its store-assigned identity and stamps.
///
/// Entities themselves carry no identifier; the store assigns one on
/// insert and stamps `created_at` / `updated_at` on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    /// Store-assigned identifier.
    pub id: i64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last update.
    pub updated_at: String,
    /// The entity itself.
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    /// Wraps a record with its identity and timestamps.
    #[must_use]
    pub const fn new(id: i64, created_at: String, updated_at: String, record: T) -> Self {
        Self {
            id,
            created_at,
            updated_at,
            record,
        }
    }
}

/// A weekly lesson slot of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Day of the week, as entered (e.g. "Lunedì").
    pub weekday: String,
    /// Name of the room the lesson takes place in.
    pub room: String,
    /// Free-form time range (e.g. "18:00-19:30").
    pub time_range: String,
}

impl Lesson {
    /// Separator used by the single-string lesson form.
    pub const SEPARATOR: char = '|';

    /// Creates a new lesson slot.
    #[must_use]
    pub fn new(weekday: &str, room: &str, time_range: &str) -> Self {
        Self {
            weekday: weekday.trim().to_string(),
            room: room.trim().to_string(),
            time_range: time_range.trim().to_string(),
        }
    }

    /// Parses the single-string form `"weekday | room | time range"`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLesson` unless exactly three parts are present.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = raw.split(Self::SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [weekday, room, time_range] => Ok(Self::new(weekday, room, time_range)),
            _ => Err(DomainError::InvalidLesson(raw.to_string())),
        }
    }

    /// Formats the lesson in its single-string form.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        format!("{} | {} | {}", self.weekday, self.room, self.time_range)
    }
}

/// A course offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course name, also the key other records refer to.
    pub name: String,
    /// Optional category name, used for display tinting.
    pub category: Option<String>,
    /// Monthly price when the course is the member's base course.
    pub base_price: f64,
    /// Monthly price when the course is taken in addition to a base course.
    pub additional_price: f64,
    /// Weekly hours of teaching.
    pub weekly_hours: f64,
    /// Weekly schedule.
    pub lessons: Vec<Lesson>,
}

impl Course {
    /// Creates a course without category or lessons.
    #[must_use]
    pub fn new(name: &str, base_price: f64, additional_price: f64) -> Self {
        Self {
            name: name.trim().to_string(),
            category: None,
            base_price,
            additional_price,
            weekly_hours: 0.0,
            lessons: Vec::new(),
        }
    }
}

/// A course category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category name.
    pub name: String,
    /// Display colour as `#RRGGBB`.
    pub color_hex: String,
}

impl Category {
    /// Creates a new category.
    #[must_use]
    pub fn new(name: &str, color_hex: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            color_hex: color_hex.trim().to_string(),
        }
    }
}

/// A room lessons are held in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room name.
    pub name: String,
    /// Maximum number of students, if known.
    pub capacity: Option<u32>,
}

impl Room {
    /// Creates a new room.
    #[must_use]
    pub fn new(name: &str, capacity: Option<u32>) -> Self {
        Self {
            name: name.trim().to_string(),
            capacity,
        }
    }
}

/// A teacher and the courses they teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Names of the courses this teacher teaches.
    pub disciplines: Vec<String>,
}

impl Teacher {
    /// Creates a teacher with no contact details.
    #[must_use]
    pub fn new(first_name: &str, last_name: &str, disciplines: Vec<String>) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: None,
            phone: None,
            disciplines,
        }
    }

    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A membership type and its enrollment fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipType {
    pub name: String,
    /// Enrollment fee as stored (e.g. "30" or "30,00").
    pub value: String,
}

impl MembershipType {
    /// Creates a membership type.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
        }
    }

    /// Parsed enrollment fee, if the stored value is numeric.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        parse_amount(&self.value)
    }
}

/// An academy member and the fees last quoted for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub first_name: String,
    pub last_name: String,
    pub fiscal_code: Option<String>,
    /// Birth date as entered (`dd/mm/yyyy` or ISO).
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Name of the member's base course.
    pub base_course: Option<String>,
    /// Names of the additional courses, never including the base course.
    pub courses: Vec<String>,
    pub enrollment_fee: f64,
    pub monthly_fee: f64,
    pub quarterly_fee: f64,
    pub annual_fee: f64,
    /// Exhibition fee included in the monthly fee; zero when not opted in.
    pub exhibition_fee: f64,
    pub notes: Option<String>,
}

impl Member {
    /// Creates a member with no courses and zero fees.
    #[must_use]
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            fiscal_code: None,
            birth_date: None,
            email: None,
            phone: None,
            base_course: None,
            courses: Vec::new(),
            enrollment_fee: 0.0,
            monthly_fee: 0.0,
            quarterly_fee: 0.0,
            annual_fee: 0.0,
            exhibition_fee: 0.0,
            notes: None,
        }
    }

    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Base course followed by the additional courses.
    pub fn all_courses(&self) -> impl Iterator<Item = &str> {
        self.base_course
            .as_deref()
            .into_iter()
            .chain(self.courses.iter().map(String::as_str))
    }
}
