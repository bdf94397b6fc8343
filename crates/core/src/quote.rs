// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::Catalog;
use accademia_domain::format::parse_amount;
use accademia_domain::{
    Course, Member, PricingSettings, QuoteBreakdown, QuoteInput, Stored, clamp_discount,
    compute_quote,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// The course and offer choices of a quote being prepared.
///
/// The base course never appears among the additional courses, additional
/// courses are unique, and every discount lies in `[0, 100]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteSelection {
    base_course: Option<String>,
    additional_courses: Vec<String>,
    discounts: BTreeMap<String, f64>,
    extra_offers: [bool; 4],
    exhibition_selected: bool,
    membership_type_id: Option<i64>,
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl QuoteSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_course(&self) -> Option<&str> {
        self.base_course.as_deref()
    }

    #[must_use]
    pub fn additional_courses(&self) -> &[String] {
        &self.additional_courses
    }

    #[must_use]
    pub const fn discounts(&self) -> &BTreeMap<String, f64> {
        &self.discounts
    }

    #[must_use]
    pub const fn extra_offers(&self) -> [bool; 4] {
        self.extra_offers
    }

    #[must_use]
    pub const fn exhibition_selected(&self) -> bool {
        self.exhibition_selected
    }

    #[must_use]
    pub const fn membership_type_id(&self) -> Option<i64> {
        self.membership_type_id
    }

    /// Sets or clears the base course.
    ///
    /// A course chosen as base is dropped from the additional courses.
    pub fn select_base(&mut self, name: Option<&str>) {
        self.base_course = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string);
        if let Some(base) = self.base_course.clone() {
            self.remove_additional(&base);
        }
    }

    /// Adds an additional course with no discount.
    ///
    /// Returns `false` and changes nothing when the course is the base
    /// course or already selected.
    pub fn add_additional(&mut self, name: &str) -> bool {
        let name: &str = name.trim();
        if name.is_empty()
            || self.base_course.as_deref().is_some_and(|b| same_name(b, name))
            || self.additional_courses.iter().any(|c| same_name(c, name))
        {
            return false;
        }
        self.additional_courses.push(name.to_string());
        true
    }

    /// Removes an additional course and its discount.
    pub fn remove_additional(&mut self, name: &str) {
        self.additional_courses.retain(|c| !same_name(c, name));
        self.discounts.retain(|c, _| !same_name(c, name));
    }

    /// Sets the discount of a selected additional course, clamped to `[0, 100]`.
    ///
    /// Ignored for courses that are not among the additional courses.
    pub fn set_discount(&mut self, name: &str, percent: f64) {
        if let Some(course) = self
            .additional_courses
            .iter()
            .find(|c| same_name(c, name))
        {
            self.discounts.insert(course.clone(), clamp_discount(percent));
        }
    }

    /// Ticks or unticks an extra offer. Indices past the fourth are ignored.
    pub fn set_offer(&mut self, index: usize, selected: bool) {
        if let Some(slot) = self.extra_offers.get_mut(index) {
            *slot = selected;
        }
    }

    /// Flips an extra offer.
    pub fn toggle_offer(&mut self, index: usize) {
        if let Some(slot) = self.extra_offers.get_mut(index) {
            *slot = !*slot;
        }
    }

    pub const fn set_exhibition(&mut self, selected: bool) {
        self.exhibition_selected = selected;
    }

    pub const fn set_membership_type(&mut self, membership_type_id: Option<i64>) {
        self.membership_type_id = membership_type_id;
    }

    /// Rebuilds a selection from a stored member.
    ///
    /// The membership type is the first whose parsed value equals the
    /// member's enrollment fee. Promotion stores that fee rounded to the
    /// nearest 5, so a type worth e.g. `32` is not recovered: the match
    /// falls to another type worth the rounded amount, or to none. Course names are matched against the
    /// current catalog and names that no longer exist are dropped. The
    /// exhibition flag is set when the member pays an exhibition fee.
    /// Discounts and extra offers are not stored and start cleared.
    #[must_use]
    pub fn from_member(member: &Member, catalog: &Catalog) -> Self {
        let mut selection: Self = Self::new();

        let base: Option<&Stored<Course>> = member
            .base_course
            .as_deref()
            .and_then(|name| catalog.course_by_name(name));
        selection.select_base(base.map(|c| c.record.name.as_str()));

        for name in &member.courses {
            if let Some(course) = catalog.course_by_name(name) {
                selection.add_additional(&course.record.name);
            }
        }

        selection.exhibition_selected = member.exhibition_fee > 0.0;
        selection.membership_type_id = catalog
            .membership_types
            .iter()
            .find(|m| {
                parse_amount(&m.record.value)
                    .is_some_and(|value| value.to_bits() == member.enrollment_fee.to_bits())
            })
            .map(|m| m.id);
        selection
    }

    /// Prices the selection against the current catalog.
    ///
    /// Courses or membership types that no longer exist contribute nothing.
    #[must_use]
    pub fn compute(&self, catalog: &Catalog) -> QuoteBreakdown {
        let pricing: PricingSettings = catalog.pricing_settings();
        let base_course: Option<&Course> = self
            .base_course
            .as_deref()
            .and_then(|name| catalog.course_by_name(name))
            .map(|stored| &stored.record);
        let additional_courses: Vec<&Course> = self
            .additional_courses
            .iter()
            .filter_map(|name| catalog.course_by_name(name))
            .map(|stored| &stored.record)
            .collect();
        // Discounts are keyed by the spelling the catalog uses.
        let discounts: BTreeMap<String, f64> = self
            .discounts
            .iter()
            .filter_map(|(name, pct)| {
                catalog
                    .course_by_name(name)
                    .map(|stored| (stored.record.name.clone(), *pct))
            })
            .collect();
        let membership_value: Option<&str> = self
            .membership_type_id
            .and_then(|id| catalog.membership_type(id))
            .map(|m| m.record.value.as_str());

        compute_quote(&QuoteInput {
            base_course,
            additional_courses,
            discounts: &discounts,
            pricing: &pricing,
            extra_offers: self.extra_offers,
            exhibition_selected: self.exhibition_selected,
            membership_value,
        })
    }

    /// Writes the selected courses and the computed fees into a member.
    pub fn promote_into(&self, breakdown: &QuoteBreakdown, member: &mut Member) {
        member.base_course.clone_from(&self.base_course);
        member.courses.clone_from(&self.additional_courses);
        member.enrollment_fee = breakdown.enrollment_fee;
        member.monthly_fee = breakdown.monthly_fee;
        member.quarterly_fee = breakdown.quarterly_fee;
        member.annual_fee = breakdown.annual_fee;
        member.exhibition_fee = breakdown.exhibition_fee;
    }
}
