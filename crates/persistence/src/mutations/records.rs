// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog record writes.
//!
//! A change set produced by `apply` (a primary write plus its cascade
//! writes) is applied inside one transaction: either every write lands
//! or none does. Inserts stamp `created_at` and `updated_at`; updates
//! stamp `updated_at` only.

use accademia::{Change, EntityKind, Record};
use accademia_domain::{Course, Member, Payment, PricingTier, Room, Teacher};
use diesel::SqliteConnection;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use tracing::{debug, info};

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::{
    categories, courses, members, membership_types, payments, pricing_tiers, rooms, teachers,
};
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = courses, treat_none_as_null = true)]
struct CourseWrite<'a> {
    name: &'a str,
    category: Option<&'a str>,
    base_price: f64,
    additional_price: f64,
    weekly_hours: f64,
    lessons_json: String,
    updated_at: &'a str,
}

impl<'a> CourseWrite<'a> {
    fn new(course: &'a Course, now: &'a str) -> Result<Self, PersistenceError> {
        Ok(Self {
            name: &course.name,
            category: course.category.as_deref(),
            base_price: course.base_price,
            additional_price: course.additional_price,
            weekly_hours: course.weekly_hours,
            lessons_json: serde_json::to_string(&course.lessons)?,
            updated_at: now,
        })
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = categories)]
struct CategoryWrite<'a> {
    name: &'a str,
    color_hex: &'a str,
    updated_at: &'a str,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = rooms, treat_none_as_null = true)]
struct RoomWrite<'a> {
    name: &'a str,
    capacity: Option<i32>,
    updated_at: &'a str,
}

impl<'a> RoomWrite<'a> {
    fn new(room: &'a Room, now: &'a str) -> Result<Self, PersistenceError> {
        let capacity: Option<i32> = room
            .capacity
            .map(|c| {
                c.to_i32().ok_or_else(|| {
                    PersistenceError::SerializationError(format!(
                        "Room capacity {c} does not fit the capacity column"
                    ))
                })
            })
            .transpose()?;
        Ok(Self {
            name: &room.name,
            capacity,
            updated_at: now,
        })
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = teachers, treat_none_as_null = true)]
struct TeacherWrite<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    disciplines_json: String,
    updated_at: &'a str,
}

impl<'a> TeacherWrite<'a> {
    fn new(teacher: &'a Teacher, now: &'a str) -> Result<Self, PersistenceError> {
        Ok(Self {
            first_name: &teacher.first_name,
            last_name: &teacher.last_name,
            email: teacher.email.as_deref(),
            phone: teacher.phone.as_deref(),
            disciplines_json: serde_json::to_string(&teacher.disciplines)?,
            updated_at: now,
        })
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = membership_types)]
struct MembershipTypeWrite<'a> {
    name: &'a str,
    value: &'a str,
    updated_at: &'a str,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = pricing_tiers)]
struct PricingTierWrite<'a> {
    position: i32,
    tier_key: &'a str,
    description: &'a str,
    value: &'a str,
    updated_at: &'a str,
}

impl<'a> PricingTierWrite<'a> {
    fn new(tier: &'a PricingTier, now: &'a str) -> Self {
        Self {
            position: tier.position,
            tier_key: &tier.key,
            description: &tier.description,
            value: &tier.value,
            updated_at: now,
        }
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = members, treat_none_as_null = true)]
struct MemberWrite<'a> {
    first_name: &'a str,
    last_name: &'a str,
    fiscal_code: Option<&'a str>,
    birth_date: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    base_course: Option<&'a str>,
    courses_json: String,
    enrollment_fee: f64,
    monthly_fee: f64,
    quarterly_fee: f64,
    annual_fee: f64,
    exhibition_fee: f64,
    notes: Option<&'a str>,
    updated_at: &'a str,
}

/// Blank optional text is stored as NULL so the fiscal code uniqueness
/// index ignores members without one.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl<'a> MemberWrite<'a> {
    fn new(member: &'a Member, now: &'a str) -> Result<Self, PersistenceError> {
        Ok(Self {
            first_name: &member.first_name,
            last_name: &member.last_name,
            fiscal_code: non_blank(member.fiscal_code.as_deref()),
            birth_date: non_blank(member.birth_date.as_deref()),
            email: non_blank(member.email.as_deref()),
            phone: non_blank(member.phone.as_deref()),
            base_course: non_blank(member.base_course.as_deref()),
            courses_json: serde_json::to_string(&member.courses)?,
            enrollment_fee: member.enrollment_fee,
            monthly_fee: member.monthly_fee,
            quarterly_fee: member.quarterly_fee,
            annual_fee: member.annual_fee,
            exhibition_fee: member.exhibition_fee,
            notes: member.notes.as_deref(),
            updated_at: now,
        })
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = payments, treat_none_as_null = true)]
struct PaymentWrite<'a> {
    member_id: i64,
    kind: &'a str,
    period_label: &'a str,
    amount: f64,
    paid_on: &'a str,
    method: Option<&'a str>,
    notes: Option<&'a str>,
    updated_at: &'a str,
}

impl<'a> PaymentWrite<'a> {
    fn new(payment: &'a Payment, now: &'a str) -> Self {
        Self {
            member_id: payment.member_id,
            kind: payment.kind.as_str(),
            period_label: &payment.period_label,
            amount: payment.amount,
            paid_on: &payment.paid_on,
            method: payment.method.as_deref(),
            notes: payment.notes.as_deref(),
            updated_at: now,
        }
    }
}

/// Applies a change set in a single transaction.
///
/// Returns the id each change touched, in order: the new row id for an
/// insert, the given id for an update or delete.
///
/// # Errors
///
/// Returns an error, and rolls back every change, if any write fails:
/// - a UNIQUE or FOREIGN KEY constraint rejects it
/// - the row to update or delete does not exist
/// - a JSON column cannot be serialized
pub fn apply_changes(
    conn: &mut SqliteConnection,
    changes: &[Change],
) -> Result<Vec<i64>, PersistenceError> {
    let now: String = now_timestamp()?;
    let ids: Vec<i64> = conn.transaction::<_, PersistenceError, _>(|conn| {
        changes
            .iter()
            .map(|change| apply_change(conn, change, &now))
            .collect()
    })?;
    info!(count = ids.len(), "Applied change set");
    Ok(ids)
}

fn apply_change(
    conn: &mut SqliteConnection,
    change: &Change,
    now: &str,
) -> Result<i64, PersistenceError> {
    match change {
        Change::Insert(record) => insert_record(conn, record, now),
        Change::Update { id, record } => {
            update_record(conn, *id, record, now)?;
            Ok(*id)
        }
        Change::Delete { kind, id } => {
            delete_record(conn, *kind, *id)?;
            Ok(*id)
        }
    }
}

fn insert_record(
    conn: &mut SqliteConnection,
    record: &Record,
    now: &str,
) -> Result<i64, PersistenceError> {
    match record {
        Record::Course(course) => {
            let write: CourseWrite<'_> = CourseWrite::new(course, now)?;
            diesel::insert_into(courses::table)
                .values((&write, courses::created_at.eq(now)))
                .execute(conn)?;
        }
        Record::Category(category) => {
            let write: CategoryWrite<'_> = CategoryWrite {
                name: &category.name,
                color_hex: &category.color_hex,
                updated_at: now,
            };
            diesel::insert_into(categories::table)
                .values((&write, categories::created_at.eq(now)))
                .execute(conn)?;
        }
        Record::Room(room) => {
            let write: RoomWrite<'_> = RoomWrite::new(room, now)?;
            diesel::insert_into(rooms::table)
                .values((&write, rooms::created_at.eq(now)))
                .execute(conn)?;
        }
        Record::Teacher(teacher) => {
            let write: TeacherWrite<'_> = TeacherWrite::new(teacher, now)?;
            diesel::insert_into(teachers::table)
                .values((&write, teachers::created_at.eq(now)))
                .execute(conn)?;
        }
        Record::Member(member) => {
            let write: MemberWrite<'_> = MemberWrite::new(member, now)?;
            diesel::insert_into(members::table)
                .values((&write, members::created_at.eq(now)))
                .execute(conn)?;
        }
        Record::MembershipType(membership_type) => {
            let write: MembershipTypeWrite<'_> = MembershipTypeWrite {
                name: &membership_type.name,
                value: &membership_type.value,
                updated_at: now,
            };
            diesel::insert_into(membership_types::table)
                .values((&write, membership_types::created_at.eq(now)))
                .execute(conn)?;
        }
        Record::PricingTier(tier) => {
            let write: PricingTierWrite<'_> = PricingTierWrite::new(tier, now);
            diesel::insert_into(pricing_tiers::table)
                .values((&write, pricing_tiers::created_at.eq(now)))
                .execute(conn)?;
        }
        Record::Payment(payment) => {
            let write: PaymentWrite<'_> = PaymentWrite::new(payment, now);
            diesel::insert_into(payments::table)
                .values((&write, payments::created_at.eq(now)))
                .execute(conn)?;
        }
    }

    let id: i64 = get_last_insert_rowid(conn)?;
    debug!(id, kind = %record.kind(), "Inserted record");
    Ok(id)
}

fn update_record(
    conn: &mut SqliteConnection,
    id: i64,
    record: &Record,
    now: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = match record {
        Record::Course(course) => diesel::update(courses::table)
            .filter(courses::course_id.eq(id))
            .set(&CourseWrite::new(course, now)?)
            .execute(conn)?,
        Record::Category(category) => diesel::update(categories::table)
            .filter(categories::category_id.eq(id))
            .set(&CategoryWrite {
                name: &category.name,
                color_hex: &category.color_hex,
                updated_at: now,
            })
            .execute(conn)?,
        Record::Room(room) => diesel::update(rooms::table)
            .filter(rooms::room_id.eq(id))
            .set(&RoomWrite::new(room, now)?)
            .execute(conn)?,
        Record::Teacher(teacher) => diesel::update(teachers::table)
            .filter(teachers::teacher_id.eq(id))
            .set(&TeacherWrite::new(teacher, now)?)
            .execute(conn)?,
        Record::Member(member) => diesel::update(members::table)
            .filter(members::member_id.eq(id))
            .set(&MemberWrite::new(member, now)?)
            .execute(conn)?,
        Record::MembershipType(membership_type) => diesel::update(membership_types::table)
            .filter(membership_types::membership_type_id.eq(id))
            .set(&MembershipTypeWrite {
                name: &membership_type.name,
                value: &membership_type.value,
                updated_at: now,
            })
            .execute(conn)?,
        Record::PricingTier(tier) => diesel::update(pricing_tiers::table)
            .filter(pricing_tiers::pricing_tier_id.eq(id))
            .set(&PricingTierWrite::new(tier, now))
            .execute(conn)?,
        Record::Payment(payment) => diesel::update(payments::table)
            .filter(payments::payment_id.eq(id))
            .set(&PaymentWrite::new(payment, now))
            .execute(conn)?,
    };

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "{} with ID {id}",
            record.kind()
        )));
    }
    debug!(id, kind = %record.kind(), "Updated record");
    Ok(())
}

fn delete_record(
    conn: &mut SqliteConnection,
    kind: EntityKind,
    id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = match kind {
        EntityKind::Course => {
            diesel::delete(courses::table.filter(courses::course_id.eq(id))).execute(conn)?
        }
        EntityKind::Category => {
            diesel::delete(categories::table.filter(categories::category_id.eq(id)))
                .execute(conn)?
        }
        EntityKind::Room => {
            diesel::delete(rooms::table.filter(rooms::room_id.eq(id))).execute(conn)?
        }
        EntityKind::Teacher => {
            diesel::delete(teachers::table.filter(teachers::teacher_id.eq(id))).execute(conn)?
        }
        EntityKind::Member => {
            diesel::delete(members::table.filter(members::member_id.eq(id))).execute(conn)?
        }
        EntityKind::MembershipType => diesel::delete(
            membership_types::table.filter(membership_types::membership_type_id.eq(id)),
        )
        .execute(conn)?,
        EntityKind::PricingTier => {
            diesel::delete(pricing_tiers::table.filter(pricing_tiers::pricing_tier_id.eq(id)))
                .execute(conn)?
        }
        EntityKind::Payment => {
            diesel::delete(payments::table.filter(payments::payment_id.eq(id))).execute(conn)?
        }
    };

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!("{kind} with ID {id}")));
    }
    info!(id, kind = %kind, "Deleted record");
    Ok(())
}
