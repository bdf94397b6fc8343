// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
pub mod format;
mod ledger;
mod pricing;
mod quote;
mod references;
pub mod token_list;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use ledger::{LedgerSummary, Payment, PaymentKind, summarize_ledger};
pub use pricing::{PricingSettings, PricingTier, TierEntry, TierKey};
pub use quote::{
    OFFER_PRIORITY, QUARTER_MONTHS, QuoteBreakdown, QuoteInput, QuoteLine, SEASON_MONTHS,
    clamp_discount, compute_quote, round_to_nearest_5,
};
pub use references::{category_dependents, course_dependents, room_dependents};
pub use types::{
    Category, Course, Lesson, Member, MembershipType, Room, Stored, Teacher,
};
pub use validation::{
    validate_category, validate_course, validate_member, validate_membership_type,
    validate_name_unique, validate_payment, validate_pricing_tier, validate_room,
    validate_teacher,
};
