// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use accademia_audit::OperationLogEntry;
use accademia_domain::{
    Category, Course, Member, MembershipType, Payment, PricingSettings, PricingTier, Room,
    Stored, Teacher,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kinds of records the catalog holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Course,
    Category,
    Room,
    Teacher,
    Member,
    MembershipType,
    PricingTier,
    Payment,
}

impl EntityKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 8] = [
        Self::Member,
        Self::Course,
        Self::Teacher,
        Self::Room,
        Self::Category,
        Self::MembershipType,
        Self::PricingTier,
        Self::Payment,
    ];

    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Category => "category",
            Self::Room => "room",
            Self::Teacher => "teacher",
            Self::Member => "member",
            Self::MembershipType => "membership type",
            Self::PricingTier => "pricing tier",
            Self::Payment => "payment",
        }
    }

    /// Name of the list this kind appears in, as used by the operations log.
    #[must_use]
    pub const fn list_name(&self) -> &'static str {
        match self {
            Self::Course => "Corsi",
            Self::Category => "Categorie",
            Self::Room => "Sale",
            Self::Teacher => "Insegnanti",
            Self::Member => "Soci",
            Self::MembershipType => "Tipologie socio",
            Self::PricingTier => "Importi preventivo",
            Self::Payment => "Pagamenti",
        }
    }

    /// URL segment of the section listing this kind.
    #[must_use]
    pub const fn section(&self) -> &'static str {
        match self {
            Self::Course => "courses",
            Self::Category => "categories",
            Self::Room => "rooms",
            Self::Teacher => "teachers",
            Self::Member => "members",
            Self::MembershipType => "membership-types",
            Self::PricingTier => "pricing-tiers",
            Self::Payment => "payments",
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.section() == s)
            .ok_or_else(|| format!("Unknown section: {s}"))
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record of any kind, as written to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Course(Course),
    Category(Category),
    Room(Room),
    Teacher(Teacher),
    Member(Member),
    MembershipType(MembershipType),
    PricingTier(PricingTier),
    Payment(Payment),
}

impl Record {
    /// The kind of this record.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Course(_) => EntityKind::Course,
            Self::Category(_) => EntityKind::Category,
            Self::Room(_) => EntityKind::Room,
            Self::Teacher(_) => EntityKind::Teacher,
            Self::Member(_) => EntityKind::Member,
            Self::MembershipType(_) => EntityKind::MembershipType,
            Self::PricingTier(_) => EntityKind::PricingTier,
            Self::Payment(_) => EntityKind::Payment,
        }
    }
}

/// One write produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Insert(Record),
    Update { id: i64, record: Record },
    Delete { kind: EntityKind, id: i64 },
}

/// The result of a successful state transition.
///
/// The first change is the one the command asked for; any further
/// changes keep referring records consistent with it. All of them must
/// be written together.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub changes: Vec<Change>,
    /// The operations log entry recording this transition.
    pub log_entry: OperationLogEntry,
}

/// Everything the academy has on record, as last loaded from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub courses: Vec<Stored<Course>>,
    pub categories: Vec<Stored<Category>>,
    pub rooms: Vec<Stored<Room>>,
    pub teachers: Vec<Stored<Teacher>>,
    pub members: Vec<Stored<Member>>,
    pub membership_types: Vec<Stored<MembershipType>>,
    pub pricing_tiers: Vec<Stored<PricingTier>>,
    pub payments: Vec<Stored<Payment>>,
}

fn find<T>(records: &[Stored<T>], id: i64) -> Option<&Stored<T>> {
    records.iter().find(|stored| stored.id == id)
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn course(&self, id: i64) -> Option<&Stored<Course>> {
        find(&self.courses, id)
    }

    #[must_use]
    pub fn category(&self, id: i64) -> Option<&Stored<Category>> {
        find(&self.categories, id)
    }

    #[must_use]
    pub fn room(&self, id: i64) -> Option<&Stored<Room>> {
        find(&self.rooms, id)
    }

    #[must_use]
    pub fn teacher(&self, id: i64) -> Option<&Stored<Teacher>> {
        find(&self.teachers, id)
    }

    #[must_use]
    pub fn member(&self, id: i64) -> Option<&Stored<Member>> {
        find(&self.members, id)
    }

    #[must_use]
    pub fn membership_type(&self, id: i64) -> Option<&Stored<MembershipType>> {
        find(&self.membership_types, id)
    }

    #[must_use]
    pub fn pricing_tier(&self, id: i64) -> Option<&Stored<PricingTier>> {
        find(&self.pricing_tiers, id)
    }

    #[must_use]
    pub fn payment(&self, id: i64) -> Option<&Stored<Payment>> {
        find(&self.payments, id)
    }

    /// Looks a course up by name, ignoring case.
    #[must_use]
    pub fn course_by_name(&self, name: &str) -> Option<&Stored<Course>> {
        self.courses.iter().find(|c| same_name(&c.record.name, name))
    }

    /// Whether a category with this name exists, ignoring case.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| same_name(&c.record.name, name))
    }

    /// Whether a room with this name exists, ignoring case.
    #[must_use]
    pub fn has_room(&self, name: &str) -> bool {
        self.rooms.iter().any(|r| same_name(&r.record.name, name))
    }

    /// Payments recorded for a member, in storage order.
    #[must_use]
    pub fn payments_of(&self, member_id: i64) -> Vec<&Stored<Payment>> {
        self.payments
            .iter()
            .filter(|p| p.record.member_id == member_id)
            .collect()
    }

    /// The pricing entries by meaning.
    ///
    /// Entries are matched by key. Rows imported without keys fall back
    /// to their position order.
    #[must_use]
    pub fn pricing_settings(&self) -> PricingSettings {
        let mut tiers: Vec<PricingTier> = self
            .pricing_tiers
            .iter()
            .map(|stored| stored.record.clone())
            .collect();
        if tiers.iter().all(|tier| tier.key.trim().is_empty()) {
            tiers.sort_by_key(|tier| tier.position);
            PricingSettings::from_legacy_order(&tiers)
        } else {
            PricingSettings::from_tiers(&tiers)
        }
    }
}
