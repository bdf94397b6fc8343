// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use accademia::QuoteSelection;
use accademia_domain::format::parse_amount;
use accademia_domain::{LedgerSummary, Member, Payment, PaymentKind, QuoteBreakdown, Stored};
use accademia_grid::SortDirection;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ========================================================================
// Authentication and operators
// ========================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub session_token: String,
    pub login_name: String,
    pub display_name: String,
    pub role: String,
    pub expires_at: String,
}

/// API request to create the first admin of an empty installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapAdminRequest {
    pub login_name: String,
    pub display_name: String,
    pub password: String,
    pub password_confirmation: String,
}

/// API request to create an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOperatorRequest {
    pub login_name: String,
    pub display_name: String,
    pub password: String,
    pub password_confirmation: String,
    /// One of `Admin`, `Contributor`, `Viewer`.
    pub role: String,
}

/// API response for a created operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOperatorResponse {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: String,
}

/// API request to disable or re-enable an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOperatorDisabledRequest {
    pub disabled: bool,
}

/// API request to change the caller's own password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// One operator in a listing, with what the caller may do to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInfo {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
    pub capabilities: OperatorCapabilities,
}

/// API response listing operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOperatorsResponse {
    pub operators: Vec<OperatorInfo>,
}

/// API response describing the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub login_name: String,
    pub display_name: String,
    pub role: String,
    pub is_disabled: bool,
    pub capabilities: GlobalCapabilities,
}

/// Generic confirmation for operations without a richer result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ========================================================================
// Capability model
// ========================================================================

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as `true`/`false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Allowed,
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        bool::deserialize(deserializer).map(Self::from_bool)
    }
}

/// What classes of actions the caller may perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCapabilities {
    pub can_manage_operators: Capability,
    /// Create and edit members.
    pub can_edit_members: Capability,
    pub can_delete_members: Capability,
    /// Courses, teachers, rooms, categories and membership types.
    pub can_edit_catalog: Capability,
    pub can_edit_pricing: Capability,
    pub can_record_payments: Capability,
    pub can_promote_quotes: Capability,
    pub can_export: Capability,
}

/// What the caller may do to one operator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCapabilities {
    pub can_disable: Capability,
    pub can_delete: Capability,
}

// ========================================================================
// Grids and records
// ========================================================================

/// Filter and sort state of a grid request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridQuery {
    /// Column key to sort by.
    pub sort: Option<String>,
    /// Defaults to ascending.
    pub direction: Option<SortDirection>,
    /// Filter text per column key.
    pub filters: BTreeMap<String, String>,
}

/// API response listing the visible rows of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecordsResponse {
    pub section: String,
    /// Rows before filtering.
    pub total: usize,
    pub rows: Vec<serde_json::Value>,
}

/// API response for a successful create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// The record the command targeted.
    pub id: i64,
    /// Writes made to keep other records consistent (e.g. after a rename).
    pub cascaded: usize,
    pub message: String,
}

/// A spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub file_name: String,
    /// Semicolon-separated UTF-8 CSV.
    pub content: Vec<u8>,
}

/// API request to change a pricing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePricingTierRequest {
    pub description: String,
    pub value: String,
}

// ========================================================================
// Payments
// ========================================================================

/// API request to record a payment for a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub kind: PaymentKind,
    #[serde(default)]
    pub period_label: String,
    pub amount: f64,
    pub paid_on: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordPaymentRequest {
    /// The payment this request records for `member_id`.
    #[must_use]
    pub fn into_payment(self, member_id: i64) -> Payment {
        Payment {
            member_id,
            kind: self.kind,
            period_label: self.period_label.trim().to_string(),
            amount: self.amount,
            paid_on: self.paid_on.trim().to_string(),
            method: self.method,
            notes: self.notes,
        }
    }
}

/// A member's payments and their totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub member_id: i64,
    pub member_name: String,
    pub payments: Vec<Stored<Payment>>,
    pub summary: LedgerSummary,
}

// ========================================================================
// Quotes
// ========================================================================

/// The choices of a quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub base_course: Option<String>,
    pub additional_courses: Vec<String>,
    /// Discount percentage per additional course name.
    ///
    /// Entries are read leniently: numbers, numeric text such as `"20"`,
    /// `"12,5"` or `"20%"` are accepted and anything else counts as 0.
    #[serde(deserialize_with = "lenient_discounts")]
    pub discounts: BTreeMap<String, f64>,
    pub extra_offers: [bool; 4],
    pub exhibition_selected: bool,
    pub membership_type_id: Option<i64>,
}

impl QuoteRequest {
    /// Builds the working selection.
    ///
    /// The base course is dropped from the additional list, duplicates are
    /// ignored and discounts are clamped, as when choices are made one at
    /// a time.
    #[must_use]
    pub fn to_selection(&self) -> QuoteSelection {
        let mut selection: QuoteSelection = QuoteSelection::new();
        selection.select_base(self.base_course.as_deref());
        for name in &self.additional_courses {
            selection.add_additional(name);
        }
        for (name, percent) in &self.discounts {
            selection.set_discount(name, *percent);
        }
        for (index, selected) in self.extra_offers.iter().enumerate() {
            selection.set_offer(index, *selected);
        }
        selection.set_exhibition(self.exhibition_selected);
        selection.set_membership_type(self.membership_type_id);
        selection
    }
}

fn lenient_discounts<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name, lenient_percent(&value)))
        .collect())
}

/// A discount typed into the quote form; blanks and junk are 0.
fn lenient_percent(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(text) => {
            let trimmed: &str = text.trim();
            parse_amount(trimmed.strip_suffix('%').unwrap_or(trimmed)).unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// A priced selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResponse {
    pub selection: QuoteSelection,
    pub breakdown: QuoteBreakdown,
}

/// API request to write a quote into a member.
///
/// With `member_id` the existing member is updated; otherwise `member`
/// supplies the personal data of a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoteQuoteRequest {
    pub quote: QuoteRequest,
    #[serde(default)]
    pub member_id: Option<i64>,
    #[serde(default)]
    pub member: Option<Member>,
}

/// API response for a promoted quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoteQuoteResponse {
    pub member_id: i64,
    pub breakdown: QuoteBreakdown,
    pub message: String,
}
