// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Catalog, Change, EntityKind, Record, Transition};
use accademia_audit::{Actor, OperationLogEntry, OperationType};
use accademia_domain::format::format_currency;
use accademia_domain::token_list::rename_token;
use accademia_domain::{
    Course, DomainError, Member, Payment, PricingTier, Stored, Teacher, category_dependents,
    course_dependents, room_dependents, validate_category, validate_course, validate_member,
    validate_membership_type, validate_name_unique, validate_payment, validate_pricing_tier,
    validate_room, validate_teacher,
};

/// Applies a command to the catalog, producing the writes to perform and
/// the operations log entry to record.
///
/// The catalog itself is not modified. Renames of courses, rooms and
/// categories produce additional updates for every record that refers to
/// the old name; deletes of records that are still referred to fail.
///
/// # Arguments
///
/// * `catalog` - The current catalog (immutable)
/// * `command` - The command to apply
/// * `actor` - The operator performing this action
///
/// # Errors
///
/// Returns an error if:
/// - A field fails validation
/// - A name is already used by another record of the same kind
/// - A referenced course, room, category or member does not exist
/// - The record to update or delete does not exist
/// - The record to delete is still referred to
#[allow(clippy::too_many_lines)]
pub fn apply(catalog: &Catalog, command: Command, actor: Actor) -> Result<Transition, CoreError> {
    match command {
        Command::CreateCourse { course } => {
            check_course(catalog, &course, None)?;
            let description: String = course.name.clone();
            Ok(transition(
                actor,
                OperationType::Insert,
                EntityKind::Course,
                description,
                vec![Change::Insert(Record::Course(course))],
            ))
        }
        Command::UpdateCourse { id, course } => {
            let existing: &Stored<Course> = require(catalog.course(id), EntityKind::Course, id)?;
            check_course(catalog, &course, Some(id))?;

            let description: String = course.name.clone();
            let mut changes: Vec<Change> = Vec::new();
            if renamed(&existing.record.name, &course.name) {
                changes.extend(course_rename_changes(
                    catalog,
                    &existing.record.name,
                    &course.name,
                ));
            }
            changes.insert(
                0,
                Change::Update {
                    id,
                    record: Record::Course(course),
                },
            );
            Ok(transition(
                actor,
                OperationType::Update,
                EntityKind::Course,
                description,
                changes,
            ))
        }
        Command::DeleteCourse { id } => {
            let existing: &Stored<Course> = require(catalog.course(id), EntityKind::Course, id)?;
            let name: &str = &existing.record.name;
            ensure_unreferenced(
                EntityKind::Course,
                name,
                course_dependents(name, &catalog.members, &catalog.teachers),
            )?;
            Ok(deletion(actor, EntityKind::Course, id, name.to_string()))
        }

        Command::CreateCategory { category } => {
            validate_category(&category)?;
            validate_name_unique(
                EntityKind::Category.as_str(),
                &category.name,
                &catalog.categories,
                |c| c.name.as_str(),
                None,
            )?;
            let description: String = category.name.clone();
            Ok(transition(
                actor,
                OperationType::Insert,
                EntityKind::Category,
                description,
                vec![Change::Insert(Record::Category(category))],
            ))
        }
        Command::UpdateCategory { id, category } => {
            let existing = require(catalog.category(id), EntityKind::Category, id)?;
            validate_category(&category)?;
            validate_name_unique(
                EntityKind::Category.as_str(),
                &category.name,
                &catalog.categories,
                |c| c.name.as_str(),
                Some(id),
            )?;

            let description: String = category.name.clone();
            let mut changes: Vec<Change> = Vec::new();
            if renamed(&existing.record.name, &category.name) {
                for stored in &catalog.courses {
                    let matches: bool = stored
                        .record
                        .category
                        .as_deref()
                        .is_some_and(|c| same_name(c, &existing.record.name));
                    if matches {
                        let mut course: Course = stored.record.clone();
                        course.category = Some(category.name.clone());
                        changes.push(Change::Update {
                            id: stored.id,
                            record: Record::Course(course),
                        });
                    }
                }
            }
            changes.insert(
                0,
                Change::Update {
                    id,
                    record: Record::Category(category),
                },
            );
            Ok(transition(
                actor,
                OperationType::Update,
                EntityKind::Category,
                description,
                changes,
            ))
        }
        Command::DeleteCategory { id } => {
            let existing = require(catalog.category(id), EntityKind::Category, id)?;
            let name: &str = &existing.record.name;
            ensure_unreferenced(
                EntityKind::Category,
                name,
                category_dependents(name, &catalog.courses),
            )?;
            Ok(deletion(actor, EntityKind::Category, id, name.to_string()))
        }

        Command::CreateRoom { room } => {
            validate_room(&room)?;
            validate_name_unique(
                EntityKind::Room.as_str(),
                &room.name,
                &catalog.rooms,
                |r| r.name.as_str(),
                None,
            )?;
            let description: String = room.name.clone();
            Ok(transition(
                actor,
                OperationType::Insert,
                EntityKind::Room,
                description,
                vec![Change::Insert(Record::Room(room))],
            ))
        }
        Command::UpdateRoom { id, room } => {
            let existing = require(catalog.room(id), EntityKind::Room, id)?;
            validate_room(&room)?;
            validate_name_unique(
                EntityKind::Room.as_str(),
                &room.name,
                &catalog.rooms,
                |r| r.name.as_str(),
                Some(id),
            )?;

            let description: String = room.name.clone();
            let mut changes: Vec<Change> = Vec::new();
            if renamed(&existing.record.name, &room.name) {
                for stored in &catalog.courses {
                    if !stored
                        .record
                        .lessons
                        .iter()
                        .any(|l| same_name(&l.room, &existing.record.name))
                    {
                        continue;
                    }
                    let mut course: Course = stored.record.clone();
                    for lesson in &mut course.lessons {
                        if same_name(&lesson.room, &existing.record.name) {
                            lesson.room.clone_from(&room.name);
                        }
                    }
                    changes.push(Change::Update {
                        id: stored.id,
                        record: Record::Course(course),
                    });
                }
            }
            changes.insert(
                0,
                Change::Update {
                    id,
                    record: Record::Room(room),
                },
            );
            Ok(transition(
                actor,
                OperationType::Update,
                EntityKind::Room,
                description,
                changes,
            ))
        }
        Command::DeleteRoom { id } => {
            let existing = require(catalog.room(id), EntityKind::Room, id)?;
            let name: &str = &existing.record.name;
            ensure_unreferenced(EntityKind::Room, name, room_dependents(name, &catalog.courses))?;
            Ok(deletion(actor, EntityKind::Room, id, name.to_string()))
        }

        Command::CreateTeacher { teacher } => {
            check_teacher(catalog, &teacher)?;
            let description: String = teacher.full_name();
            Ok(transition(
                actor,
                OperationType::Insert,
                EntityKind::Teacher,
                description,
                vec![Change::Insert(Record::Teacher(teacher))],
            ))
        }
        Command::UpdateTeacher { id, teacher } => {
            require(catalog.teacher(id), EntityKind::Teacher, id)?;
            check_teacher(catalog, &teacher)?;
            let description: String = teacher.full_name();
            Ok(transition(
                actor,
                OperationType::Update,
                EntityKind::Teacher,
                description,
                vec![Change::Update {
                    id,
                    record: Record::Teacher(teacher),
                }],
            ))
        }
        Command::DeleteTeacher { id } => {
            let existing = require(catalog.teacher(id), EntityKind::Teacher, id)?;
            Ok(deletion(
                actor,
                EntityKind::Teacher,
                id,
                existing.record.full_name(),
            ))
        }

        Command::CreateMember { member } => {
            check_member(catalog, &member, None)?;
            let description: String = member.full_name();
            Ok(transition(
                actor,
                OperationType::Insert,
                EntityKind::Member,
                description,
                vec![Change::Insert(Record::Member(member))],
            ))
        }
        Command::UpdateMember { id, member } => {
            require(catalog.member(id), EntityKind::Member, id)?;
            check_member(catalog, &member, Some(id))?;
            let description: String = member.full_name();
            Ok(transition(
                actor,
                OperationType::Update,
                EntityKind::Member,
                description,
                vec![Change::Update {
                    id,
                    record: Record::Member(member),
                }],
            ))
        }
        Command::DeleteMember { id } => {
            let existing: &Stored<Member> = require(catalog.member(id), EntityKind::Member, id)?;
            let name: String = existing.record.full_name();
            let dependents: Vec<String> = catalog
                .payments_of(id)
                .into_iter()
                .map(|p| {
                    format!("payment {} {}", p.record.kind, p.record.period_label)
                        .trim_end()
                        .to_string()
                })
                .collect();
            ensure_unreferenced(EntityKind::Member, &name, dependents)?;
            Ok(deletion(actor, EntityKind::Member, id, name))
        }

        Command::CreateMembershipType { membership_type } => {
            validate_membership_type(&membership_type)?;
            validate_name_unique(
                EntityKind::MembershipType.as_str(),
                &membership_type.name,
                &catalog.membership_types,
                |m| m.name.as_str(),
                None,
            )?;
            let description: String = membership_type.name.clone();
            Ok(transition(
                actor,
                OperationType::Insert,
                EntityKind::MembershipType,
                description,
                vec![Change::Insert(Record::MembershipType(membership_type))],
            ))
        }
        Command::UpdateMembershipType {
            id,
            membership_type,
        } => {
            require(
                catalog.membership_type(id),
                EntityKind::MembershipType,
                id,
            )?;
            validate_membership_type(&membership_type)?;
            validate_name_unique(
                EntityKind::MembershipType.as_str(),
                &membership_type.name,
                &catalog.membership_types,
                |m| m.name.as_str(),
                Some(id),
            )?;
            let description: String = membership_type.name.clone();
            Ok(transition(
                actor,
                OperationType::Update,
                EntityKind::MembershipType,
                description,
                vec![Change::Update {
                    id,
                    record: Record::MembershipType(membership_type),
                }],
            ))
        }
        Command::DeleteMembershipType { id } => {
            let existing = require(
                catalog.membership_type(id),
                EntityKind::MembershipType,
                id,
            )?;
            Ok(deletion(
                actor,
                EntityKind::MembershipType,
                id,
                existing.record.name.clone(),
            ))
        }

        Command::UpdatePricingTier {
            id,
            description,
            value,
        } => {
            let existing = require(catalog.pricing_tier(id), EntityKind::PricingTier, id)?;
            let tier: PricingTier = PricingTier::new(
                existing.record.position,
                &existing.record.key,
                description.trim(),
                value.trim(),
            );
            validate_pricing_tier(&tier)?;
            let log_description: String = format!("{}: {}", tier.description, tier.value);
            Ok(transition(
                actor,
                OperationType::Update,
                EntityKind::PricingTier,
                log_description,
                vec![Change::Update {
                    id,
                    record: Record::PricingTier(tier),
                }],
            ))
        }

        Command::RecordPayment { payment } => {
            validate_payment(&payment)?;
            let member: &Stored<Member> = require(
                catalog.member(payment.member_id),
                EntityKind::Member,
                payment.member_id,
            )?;
            let description: String = describe_payment(&member.record, &payment);
            Ok(transition(
                actor,
                OperationType::Insert,
                EntityKind::Payment,
                description,
                vec![Change::Insert(Record::Payment(payment))],
            ))
        }
        Command::DeletePayment { id } => {
            let existing: &Stored<Payment> =
                require(catalog.payment(id), EntityKind::Payment, id)?;
            let description: String = catalog.member(existing.record.member_id).map_or_else(
                || format!("{} {}", existing.record.kind, existing.record.period_label),
                |member| describe_payment(&member.record, &existing.record),
            );
            Ok(deletion(actor, EntityKind::Payment, id, description))
        }
    }
}

fn transition(
    actor: Actor,
    operation: OperationType,
    kind: EntityKind,
    description: String,
    changes: Vec<Change>,
) -> Transition {
    Transition {
        changes,
        log_entry: OperationLogEntry::new(
            actor,
            operation,
            kind.list_name().to_string(),
            description,
        ),
    }
}

fn deletion(actor: Actor, kind: EntityKind, id: i64, description: String) -> Transition {
    transition(
        actor,
        OperationType::Delete,
        kind,
        description,
        vec![Change::Delete { kind, id }],
    )
}

fn require<T>(found: Option<&T>, kind: EntityKind, id: i64) -> Result<&T, CoreError> {
    found.ok_or(CoreError::RecordNotFound { kind, id })
}

fn ensure_unreferenced(
    kind: EntityKind,
    name: &str,
    dependents: Vec<String>,
) -> Result<(), CoreError> {
    if dependents.is_empty() {
        return Ok(());
    }
    Err(CoreError::StillReferenced {
        kind,
        name: name.to_string(),
        dependents,
    })
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn renamed(old: &str, new: &str) -> bool {
    old.trim() != new.trim()
}

fn unknown(field: &'static str, kind: EntityKind, name: &str) -> CoreError {
    CoreError::DomainViolation(DomainError::InvalidField {
        field,
        message: format!("No {kind} named '{name}'"),
    })
}

fn check_course(catalog: &Catalog, course: &Course, exclude: Option<i64>) -> Result<(), CoreError> {
    validate_course(course)?;
    validate_name_unique(
        EntityKind::Course.as_str(),
        &course.name,
        &catalog.courses,
        |c| c.name.as_str(),
        exclude,
    )?;
    let category: &str = course.category.as_deref().map_or("", str::trim);
    if !category.is_empty() && !catalog.has_category(category) {
        return Err(unknown("category", EntityKind::Category, category));
    }
    if let Some(lesson) = course.lessons.iter().find(|l| !catalog.has_room(&l.room)) {
        return Err(unknown("lessons", EntityKind::Room, &lesson.room));
    }
    Ok(())
}

fn check_teacher(catalog: &Catalog, teacher: &Teacher) -> Result<(), CoreError> {
    validate_teacher(teacher)?;
    if let Some(missing) = teacher
        .disciplines
        .iter()
        .find(|name| catalog.course_by_name(name).is_none())
    {
        return Err(unknown("disciplines", EntityKind::Course, missing));
    }
    Ok(())
}

fn check_member(catalog: &Catalog, member: &Member, exclude: Option<i64>) -> Result<(), CoreError> {
    validate_member(member)?;
    if let Some(missing) = member
        .all_courses()
        .find(|name| catalog.course_by_name(name).is_none())
    {
        return Err(unknown("courses", EntityKind::Course, missing));
    }

    let fiscal_code: &str = member.fiscal_code.as_deref().map_or("", str::trim);
    if !fiscal_code.is_empty() {
        let taken: bool = catalog
            .members
            .iter()
            .filter(|stored| Some(stored.id) != exclude)
            .filter_map(|stored| stored.record.fiscal_code.as_deref())
            .any(|other| other.trim().eq_ignore_ascii_case(fiscal_code));
        if taken {
            return Err(CoreError::DomainViolation(DomainError::DuplicateName {
                entity: "fiscal code",
                name: fiscal_code.to_string(),
            }));
        }
    }
    Ok(())
}

/// Updates for every member and teacher that refers to a renamed course.
fn course_rename_changes(catalog: &Catalog, old: &str, new: &str) -> Vec<Change> {
    let mut changes: Vec<Change> = Vec::new();

    for stored in &catalog.members {
        let mut member: Member = stored.record.clone();
        let mut touched: bool = false;
        if member.base_course.as_deref().is_some_and(|b| same_name(b, old)) {
            member.base_course = Some(new.trim().to_string());
            touched = true;
        }
        if let Some(courses) = rename_token(&member.courses, old, new) {
            member.courses = courses;
            touched = true;
        }
        if touched {
            changes.push(Change::Update {
                id: stored.id,
                record: Record::Member(member),
            });
        }
    }

    for stored in &catalog.teachers {
        if let Some(disciplines) = rename_token(&stored.record.disciplines, old, new) {
            let mut teacher: Teacher = stored.record.clone();
            teacher.disciplines = disciplines;
            changes.push(Change::Update {
                id: stored.id,
                record: Record::Teacher(teacher),
            });
        }
    }

    changes
}

fn describe_payment(member: &Member, payment: &Payment) -> String {
    let period: String = if payment.period_label.trim().is_empty() {
        String::new()
    } else {
        format!(" {}", payment.period_label.trim())
    };
    format!(
        "{} - {}{} ({})",
        member.full_name(),
        payment.kind,
        period,
        format_currency(payment.amount)
    )
}
