// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::format::{parse_amount, parse_date_loose, parse_percent};
use crate::ledger::{Payment, PaymentKind};
use crate::pricing::{PricingTier, TierKey};
use crate::token_list::contains_token;
use crate::types::{Category, Course, Member, MembershipType, Room, Stored, Teacher};

/// Validates a course's fields.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - A price or the weekly hours are negative or not finite
/// - A lesson has no weekday or no room
pub fn validate_course(course: &Course) -> Result<(), DomainError> {
    require("course", "name", &course.name)?;
    require_amount("base_price", course.base_price)?;
    require_amount("additional_price", course.additional_price)?;
    require_amount("weekly_hours", course.weekly_hours)?;
    for lesson in &course.lessons {
        require("lesson", "weekday", &lesson.weekday)?;
        require("lesson", "room", &lesson.room)?;
    }
    Ok(())
}

/// Validates a category's fields.
///
/// # Errors
///
/// Returns an error if the name is empty or the colour is not `#RRGGBB`.
pub fn validate_category(category: &Category) -> Result<(), DomainError> {
    require("category", "name", &category.name)?;
    let hex: &str = category.color_hex.strip_prefix('#').unwrap_or("");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::InvalidField {
            field: "color_hex",
            message: format!("'{}' is not a #RRGGBB colour", category.color_hex),
        });
    }
    Ok(())
}

/// Validates a room's fields.
///
/// # Errors
///
/// Returns an error if the name is empty or the capacity does not fit
/// the stored integer column.
pub fn validate_room(room: &Room) -> Result<(), DomainError> {
    require("room", "name", &room.name)?;
    match room.capacity.filter(|c| i32::try_from(*c).is_err()) {
        Some(capacity) => Err(DomainError::InvalidField {
            field: "capacity",
            message: format!("{capacity} is not a plausible room capacity"),
        }),
        None => Ok(()),
    }
}

/// Validates a teacher's fields.
///
/// # Errors
///
/// Returns an error if a name is empty or the email is malformed.
pub fn validate_teacher(teacher: &Teacher) -> Result<(), DomainError> {
    require("teacher", "first_name", &teacher.first_name)?;
    require("teacher", "last_name", &teacher.last_name)?;
    validate_email(teacher.email.as_deref())
}

/// Validates a membership type.
///
/// # Errors
///
/// Returns an error if the name is empty or the value is not an amount.
pub fn validate_membership_type(membership: &MembershipType) -> Result<(), DomainError> {
    require("membership type", "name", &membership.name)?;
    if membership.amount().is_none() {
        return Err(DomainError::InvalidField {
            field: "value",
            message: format!("'{}' is not an amount", membership.value),
        });
    }
    Ok(())
}

/// Validates a member's fields.
///
/// # Errors
///
/// Returns an error if:
/// - A name is empty
/// - The fiscal code is not 16 alphanumeric characters
/// - The birth date is not a recognisable date
/// - The email is malformed
/// - A fee is negative or not finite
/// - The base course is also listed among the additional courses
pub fn validate_member(member: &Member) -> Result<(), DomainError> {
    require("member", "first_name", &member.first_name)?;
    require("member", "last_name", &member.last_name)?;

    let fiscal_code: &str = member.fiscal_code.as_deref().map_or("", str::trim);
    if !fiscal_code.is_empty()
        && (fiscal_code.len() != 16 || !fiscal_code.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        return Err(DomainError::InvalidField {
            field: "fiscal_code",
            message: String::from("Fiscal code must be 16 letters or digits"),
        });
    }

    let birth_date: &str = member.birth_date.as_deref().map_or("", str::trim);
    if !birth_date.is_empty() && parse_date_loose(birth_date).is_none() {
        return Err(DomainError::DateParseError {
            date_string: birth_date.to_string(),
            error: String::from("expected dd/mm/yyyy"),
        });
    }

    validate_email(member.email.as_deref())?;

    require_amount("enrollment_fee", member.enrollment_fee)?;
    require_amount("monthly_fee", member.monthly_fee)?;
    require_amount("quarterly_fee", member.quarterly_fee)?;
    require_amount("annual_fee", member.annual_fee)?;
    require_amount("exhibition_fee", member.exhibition_fee)?;

    if let Some(base) = member
        .base_course
        .as_deref()
        .filter(|base| contains_token(&member.courses, base))
    {
        return Err(DomainError::InvalidField {
            field: "courses",
            message: format!("'{base}' is already the base course"),
        });
    }
    Ok(())
}

/// Validates a payment.
///
/// # Errors
///
/// Returns an error if the amount is not positive, the date is not
/// recognisable, or a non-enrollment payment has no period label.
pub fn validate_payment(payment: &Payment) -> Result<(), DomainError> {
    if !payment.amount.is_finite() || payment.amount <= 0.0 {
        return Err(DomainError::InvalidField {
            field: "amount",
            message: String::from("Amount must be greater than zero"),
        });
    }
    if parse_date_loose(&payment.paid_on).is_none() {
        return Err(DomainError::DateParseError {
            date_string: payment.paid_on.clone(),
            error: String::from("expected dd/mm/yyyy"),
        });
    }
    if payment.kind != PaymentKind::Enrollment {
        require("payment", "period_label", &payment.period_label)?;
    }
    Ok(())
}

/// Validates a pricing entry against the meaning of its key.
///
/// Empty values are allowed and mean "absent".
///
/// # Errors
///
/// Returns an error if the key is unknown, a percentage entry is not a
/// percentage, or the exhibition fee is not an amount.
pub fn validate_pricing_tier(tier: &PricingTier) -> Result<(), DomainError> {
    let key: TierKey = tier
        .key
        .parse::<TierKey>()
        .map_err(|()| DomainError::InvalidField {
            field: "key",
            message: format!("Unknown pricing key '{}'", tier.key),
        })?;
    let value: &str = tier.value.trim();
    if value.is_empty() {
        return Ok(());
    }
    let valid: bool = match key {
        _ if key.is_percent() => parse_percent(value).is_some(),
        TierKey::ExhibitionFee => parse_amount(value).is_some(),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidField {
            field: "value",
            message: format!("'{value}' is not valid for {}", key.as_str()),
        })
    }
}

/// Checks that no other stored record uses `name` (case-insensitively).
///
/// # Arguments
///
/// * `entity` - The kind of record, used in the error
/// * `name` - The candidate name
/// * `existing` - The stored records of the same kind
/// * `name_of` - Extracts the name of a stored record
/// * `exclude_id` - The record being updated, if any
///
/// # Errors
///
/// Returns `DomainError::DuplicateName` if another record uses the name.
pub fn validate_name_unique<T, F>(
    entity: &'static str,
    name: &str,
    existing: &[Stored<T>],
    name_of: F,
    exclude_id: Option<i64>,
) -> Result<(), DomainError>
where
    F: Fn(&T) -> &str,
{
    let wanted: String = name.trim().to_lowercase();
    let clash: bool = existing
        .iter()
        .filter(|stored| Some(stored.id) != exclude_id)
        .any(|stored| name_of(&stored.record).trim().to_lowercase() == wanted);
    if clash {
        return Err(DomainError::DuplicateName {
            entity,
            name: name.trim().to_string(),
        });
    }
    Ok(())
}

fn require(entity: &'static str, field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField { entity, field });
    }
    Ok(())
}

fn require_amount(field: &'static str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::InvalidField {
            field,
            message: format!("{value} must be a non-negative number"),
        });
    }
    Ok(())
}

fn validate_email(email: Option<&str>) -> Result<(), DomainError> {
    let email: &str = email.map_or("", str::trim);
    if email.is_empty() {
        return Ok(());
    }
    let valid: bool = email
        .split_once('@')
        .is_some_and(|(user, host)| !user.is_empty() && host.contains('.'));
    if !valid {
        return Err(DomainError::InvalidField {
            field: "email",
            message: format!("'{email}' is not an email address"),
        });
    }
    Ok(())
}
