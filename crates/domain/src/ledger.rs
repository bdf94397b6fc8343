// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::quote::SEASON_MONTHS;
use crate::types::Member;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What a payment covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentKind {
    Enrollment,
    Monthly,
    Quarterly,
    Annual,
}

impl PaymentKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enrollment => "Enrollment",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
        }
    }

    /// Number of season months the payment covers.
    #[must_use]
    pub const fn months_covered(&self) -> u32 {
        match self {
            Self::Enrollment => 0,
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annual => 9,
        }
    }
}

impl FromStr for PaymentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enrollment" => Ok(Self::Enrollment),
            "Monthly" => Ok(Self::Monthly),
            "Quarterly" => Ok(Self::Quarterly),
            "Annual" => Ok(Self::Annual),
            _ => Err(DomainError::InvalidPaymentKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment recorded against a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub member_id: i64,
    pub kind: PaymentKind,
    /// Period the payment refers to (e.g. "Ottobre 2025"); may be empty for enrollment.
    pub period_label: String,
    pub amount: f64,
    /// Payment date as entered.
    pub paid_on: String,
    pub method: Option<String>,
    pub notes: Option<String>,
}

/// Totals of a member's payments for the season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_paid: f64,
    /// Months paid for, capped at the season length.
    pub months_covered: u32,
    pub months_outstanding: u32,
    pub enrollment_paid: bool,
    /// Enrollment fee plus nine monthly fees.
    pub expected_season_total: f64,
    pub balance_due: f64,
}

/// Summarises the payments recorded for a member.
#[must_use]
pub fn summarize_ledger(member: &Member, payments: &[Payment]) -> LedgerSummary {
    let season_months: u32 = SEASON_MONTHS.to_u32().unwrap_or(9);
    let total_paid: f64 = payments.iter().map(|p| p.amount).sum();
    let months_covered: u32 = payments
        .iter()
        .map(|p| p.kind.months_covered())
        .sum::<u32>()
        .min(season_months);
    let enrollment_paid: bool = payments
        .iter()
        .any(|p| p.kind == PaymentKind::Enrollment);
    let expected_season_total: f64 = member.enrollment_fee + member.monthly_fee * SEASON_MONTHS;

    LedgerSummary {
        total_paid,
        months_covered,
        months_outstanding: season_months - months_covered,
        enrollment_paid,
        expected_season_total,
        balance_due: (expected_season_total - total_paid).max(0.0),
    }
}
