// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog queries.

use accademia::Catalog;
use accademia_domain::{
    Category, Course, Lesson, Member, MembershipType, Payment, PaymentKind, PricingTier, Room,
    Stored, Teacher,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use tracing::debug;

use crate::diesel_schema::{
    categories, courses, members, membership_types, payments, pricing_tiers, rooms, teachers,
};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = courses)]
struct CourseRow {
    course_id: i64,
    name: String,
    category: Option<String>,
    base_price: f64,
    additional_price: f64,
    weekly_hours: f64,
    lessons_json: String,
    created_at: String,
    updated_at: String,
}

impl CourseRow {
    fn into_stored(self) -> Result<Stored<Course>, PersistenceError> {
        let lessons: Vec<Lesson> = serde_json::from_str(&self.lessons_json)?;
        Ok(Stored::new(
            self.course_id,
            self.created_at,
            self.updated_at,
            Course {
                name: self.name,
                category: self.category,
                base_price: self.base_price,
                additional_price: self.additional_price,
                weekly_hours: self.weekly_hours,
                lessons,
            },
        ))
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = categories)]
struct CategoryRow {
    category_id: i64,
    name: String,
    color_hex: String,
    created_at: String,
    updated_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = rooms)]
struct RoomRow {
    room_id: i64,
    name: String,
    capacity: Option<i32>,
    created_at: String,
    updated_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = teachers)]
struct TeacherRow {
    teacher_id: i64,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    disciplines_json: String,
    created_at: String,
    updated_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = membership_types)]
struct MembershipTypeRow {
    membership_type_id: i64,
    name: String,
    value: String,
    created_at: String,
    updated_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = pricing_tiers)]
struct PricingTierRow {
    pricing_tier_id: i64,
    position: i32,
    tier_key: String,
    description: String,
    value: String,
    created_at: String,
    updated_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = members)]
struct MemberRow {
    member_id: i64,
    first_name: String,
    last_name: String,
    fiscal_code: Option<String>,
    birth_date: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    base_course: Option<String>,
    courses_json: String,
    enrollment_fee: f64,
    monthly_fee: f64,
    quarterly_fee: f64,
    annual_fee: f64,
    exhibition_fee: f64,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl MemberRow {
    fn into_stored(self) -> Result<Stored<Member>, PersistenceError> {
        let courses: Vec<String> = serde_json::from_str(&self.courses_json)?;
        Ok(Stored::new(
            self.member_id,
            self.created_at,
            self.updated_at,
            Member {
                first_name: self.first_name,
                last_name: self.last_name,
                fiscal_code: self.fiscal_code,
                birth_date: self.birth_date,
                email: self.email,
                phone: self.phone,
                base_course: self.base_course,
                courses,
                enrollment_fee: self.enrollment_fee,
                monthly_fee: self.monthly_fee,
                quarterly_fee: self.quarterly_fee,
                annual_fee: self.annual_fee,
                exhibition_fee: self.exhibition_fee,
                notes: self.notes,
            },
        ))
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = payments)]
struct PaymentRow {
    payment_id: i64,
    member_id: i64,
    kind: String,
    period_label: String,
    amount: f64,
    paid_on: String,
    method: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PaymentRow {
    fn into_stored(self) -> Result<Stored<Payment>, PersistenceError> {
        let kind: PaymentKind = self
            .kind
            .parse()
            .map_err(|e| PersistenceError::SerializationError(format!("{e}")))?;
        Ok(Stored::new(
            self.payment_id,
            self.created_at,
            self.updated_at,
            Payment {
                member_id: self.member_id,
                kind,
                period_label: self.period_label,
                amount: self.amount,
                paid_on: self.paid_on,
                method: self.method,
                notes: self.notes,
            },
        ))
    }
}

/// Lists courses ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails or a lessons column is not valid JSON.
pub fn list_courses(conn: &mut SqliteConnection) -> Result<Vec<Stored<Course>>, PersistenceError> {
    debug!("Listing courses");
    courses::table
        .order(courses::name.asc())
        .select(CourseRow::as_select())
        .load::<CourseRow>(conn)?
        .into_iter()
        .map(CourseRow::into_stored)
        .collect()
}

/// Lists categories ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_categories(
    conn: &mut SqliteConnection,
) -> Result<Vec<Stored<Category>>, PersistenceError> {
    debug!("Listing categories");
    let rows: Vec<CategoryRow> = categories::table
        .order(categories::name.asc())
        .select(CategoryRow::as_select())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            Stored::new(
                row.category_id,
                row.created_at,
                row.updated_at,
                Category {
                    name: row.name,
                    color_hex: row.color_hex,
                },
            )
        })
        .collect())
}

/// Lists rooms ordered by name.
///
/// A negative stored capacity reads back as unknown.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_rooms(conn: &mut SqliteConnection) -> Result<Vec<Stored<Room>>, PersistenceError> {
    debug!("Listing rooms");
    let rows: Vec<RoomRow> = rooms::table
        .order(rooms::name.asc())
        .select(RoomRow::as_select())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            Stored::new(
                row.room_id,
                row.created_at,
                row.updated_at,
                Room {
                    name: row.name,
                    capacity: row.capacity.and_then(|c| c.to_u32()),
                },
            )
        })
        .collect())
}

/// Lists teachers ordered by last name, then first name.
///
/// # Errors
///
/// Returns an error if the query fails or a disciplines column is not valid JSON.
pub fn list_teachers(
    conn: &mut SqliteConnection,
) -> Result<Vec<Stored<Teacher>>, PersistenceError> {
    debug!("Listing teachers");
    let rows: Vec<TeacherRow> = teachers::table
        .order((teachers::last_name.asc(), teachers::first_name.asc()))
        .select(TeacherRow::as_select())
        .load(conn)?;
    rows.into_iter()
        .map(|row| -> Result<Stored<Teacher>, PersistenceError> {
            let disciplines: Vec<String> = serde_json::from_str(&row.disciplines_json)?;
            Ok(Stored::new(
                row.teacher_id,
                row.created_at,
                row.updated_at,
                Teacher {
                    first_name: row.first_name,
                    last_name: row.last_name,
                    email: row.email,
                    phone: row.phone,
                    disciplines,
                },
            ))
        })
        .collect()
}

/// Lists membership types in insertion order.
///
/// Insertion order matters: a member's enrollment fee maps back to the
/// first type with that value.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_membership_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<Stored<MembershipType>>, PersistenceError> {
    debug!("Listing membership types");
    let rows: Vec<MembershipTypeRow> = membership_types::table
        .order(membership_types::membership_type_id.asc())
        .select(MembershipTypeRow::as_select())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            Stored::new(
                row.membership_type_id,
                row.created_at,
                row.updated_at,
                MembershipType {
                    name: row.name,
                    value: row.value,
                },
            )
        })
        .collect())
}

/// Lists pricing tiers ordered by position.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_pricing_tiers(
    conn: &mut SqliteConnection,
) -> Result<Vec<Stored<PricingTier>>, PersistenceError> {
    debug!("Listing pricing tiers");
    let rows: Vec<PricingTierRow> = pricing_tiers::table
        .order(pricing_tiers::position.asc())
        .select(PricingTierRow::as_select())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            Stored::new(
                row.pricing_tier_id,
                row.created_at,
                row.updated_at,
                PricingTier {
                    position: row.position,
                    key: row.tier_key,
                    description: row.description,
                    value: row.value,
                },
            )
        })
        .collect())
}

/// Lists members ordered by last name, then first name.
///
/// # Errors
///
/// Returns an error if the query fails or a courses column is not valid JSON.
pub fn list_members(conn: &mut SqliteConnection) -> Result<Vec<Stored<Member>>, PersistenceError> {
    debug!("Listing members");
    members::table
        .order((members::last_name.asc(), members::first_name.asc()))
        .select(MemberRow::as_select())
        .load::<MemberRow>(conn)?
        .into_iter()
        .map(MemberRow::into_stored)
        .collect()
}

/// Lists payments in recording order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored kind is unknown.
pub fn list_payments(conn: &mut SqliteConnection) -> Result<Vec<Stored<Payment>>, PersistenceError> {
    debug!("Listing payments");
    payments::table
        .order(payments::payment_id.asc())
        .select(PaymentRow::as_select())
        .load::<PaymentRow>(conn)?
        .into_iter()
        .map(PaymentRow::into_stored)
        .collect()
}

/// Loads every catalog table into one snapshot.
///
/// # Errors
///
/// Returns an error if any of the underlying queries fails.
pub fn load_catalog(conn: &mut SqliteConnection) -> Result<Catalog, PersistenceError> {
    let mut catalog: Catalog = Catalog::new();
    catalog.courses = list_courses(conn)?;
    catalog.categories = list_categories(conn)?;
    catalog.rooms = list_rooms(conn)?;
    catalog.teachers = list_teachers(conn)?;
    catalog.members = list_members(conn)?;
    catalog.membership_types = list_membership_types(conn)?;
    catalog.pricing_tiers = list_pricing_tiers(conn)?;
    catalog.payments = list_payments(conn)?;
    debug!(
        courses = catalog.courses.len(),
        members = catalog.members.len(),
        "Loaded catalog"
    );
    Ok(catalog)
}
