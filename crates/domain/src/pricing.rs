// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A stored pricing entry (offer percentage, fee or payment text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Display order; also the legacy positional index.
    pub position: i32,
    /// Stable key identifying what this entry means (see [`TierKey`]).
    pub key: String,
    /// Label shown next to the value.
    pub description: String,
    /// Raw value: `"10%"` for percentages, a decimal for amounts, free text otherwise.
    pub value: String,
}

impl PricingTier {
    /// Creates a pricing entry.
    #[must_use]
    pub fn new(position: i32, key: &str, description: &str, value: &str) -> Self {
        Self {
            position,
            key: key.to_string(),
            description: description.to_string(),
            value: value.to_string(),
        }
    }
}

/// The meaning of a pricing entry.
///
/// The declaration order matches the legacy positional layout, where
/// indices 0–3 are the extra offers, 4 the exhibition fee, 5 and 6 the
/// quarterly and annual discounts, 7 and 8 the payment details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierKey {
    FirstOffer,
    SecondOffer,
    ThirdOffer,
    FourthOffer,
    ExhibitionFee,
    QuarterlyDiscount,
    AnnualDiscount,
    Iban,
    Payee,
}

impl TierKey {
    /// All keys in legacy positional order.
    pub const ALL: [Self; 9] = [
        Self::FirstOffer,
        Self::SecondOffer,
        Self::ThirdOffer,
        Self::FourthOffer,
        Self::ExhibitionFee,
        Self::QuarterlyDiscount,
        Self::AnnualDiscount,
        Self::Iban,
        Self::Payee,
    ];

    /// Storage key for this entry.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstOffer => "offer_1",
            Self::SecondOffer => "offer_2",
            Self::ThirdOffer => "offer_3",
            Self::FourthOffer => "offer_4",
            Self::ExhibitionFee => "exhibition_fee",
            Self::QuarterlyDiscount => "quarterly_discount",
            Self::AnnualDiscount => "annual_discount",
            Self::Iban => "iban",
            Self::Payee => "payee",
        }
    }

    /// Whether the value is expected to be a percentage.
    #[must_use]
    pub const fn is_percent(&self) -> bool {
        matches!(
            self,
            Self::FirstOffer
                | Self::SecondOffer
                | Self::ThirdOffer
                | Self::FourthOffer
                | Self::QuarterlyDiscount
                | Self::AnnualDiscount
        )
    }
}

impl FromStr for TierKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Description and raw value of one pricing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierEntry {
    pub description: String,
    pub value: String,
}

impl From<&PricingTier> for TierEntry {
    fn from(tier: &PricingTier) -> Self {
        Self {
            description: tier.description.clone(),
            value: tier.value.clone(),
        }
    }
}

/// Pricing configuration addressed by name.
///
/// Every field is optional: a missing entry means the corresponding
/// offer, fee or discount is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    pub first_offer: Option<TierEntry>,
    pub second_offer: Option<TierEntry>,
    pub third_offer: Option<TierEntry>,
    pub fourth_offer: Option<TierEntry>,
    pub exhibition_fee: Option<TierEntry>,
    pub quarterly_discount: Option<TierEntry>,
    pub annual_discount: Option<TierEntry>,
    pub iban: Option<TierEntry>,
    pub payee: Option<TierEntry>,
}

impl PricingSettings {
    /// Builds the settings by matching each entry's key.
    ///
    /// Unknown keys are ignored. When a key appears twice the first
    /// entry wins.
    #[must_use]
    pub fn from_tiers(tiers: &[PricingTier]) -> Self {
        let mut settings: Self = Self::default();
        for tier in tiers {
            if let Ok(key) = tier.key.parse::<TierKey>() {
                let slot: &mut Option<TierEntry> = settings.slot_mut(key);
                if slot.is_none() {
                    *slot = Some(TierEntry::from(tier));
                }
            }
        }
        settings
    }

    /// Builds the settings from entries in legacy positional order.
    ///
    /// Entries beyond the ninth are ignored; missing trailing entries
    /// leave the corresponding settings absent.
    #[must_use]
    pub fn from_legacy_order(tiers: &[PricingTier]) -> Self {
        let mut settings: Self = Self::default();
        for (key, tier) in TierKey::ALL.into_iter().zip(tiers) {
            *settings.slot_mut(key) = Some(TierEntry::from(tier));
        }
        settings
    }

    /// Returns the entry for a key.
    #[must_use]
    pub const fn get(&self, key: TierKey) -> Option<&TierEntry> {
        match key {
            TierKey::FirstOffer => self.first_offer.as_ref(),
            TierKey::SecondOffer => self.second_offer.as_ref(),
            TierKey::ThirdOffer => self.third_offer.as_ref(),
            TierKey::FourthOffer => self.fourth_offer.as_ref(),
            TierKey::ExhibitionFee => self.exhibition_fee.as_ref(),
            TierKey::QuarterlyDiscount => self.quarterly_discount.as_ref(),
            TierKey::AnnualDiscount => self.annual_discount.as_ref(),
            TierKey::Iban => self.iban.as_ref(),
            TierKey::Payee => self.payee.as_ref(),
        }
    }

    /// Returns the extra offer at `index` (0–3).
    #[must_use]
    pub fn offer(&self, index: usize) -> Option<&TierEntry> {
        TierKey::ALL
            .get(index)
            .filter(|key| index < 4 && key.is_percent())
            .and_then(|key| self.get(*key))
    }

    const fn slot_mut(&mut self, key: TierKey) -> &mut Option<TierEntry> {
        match key {
            TierKey::FirstOffer => &mut self.first_offer,
            TierKey::SecondOffer => &mut self.second_offer,
            TierKey::ThirdOffer => &mut self.third_offer,
            TierKey::FourthOffer => &mut self.fourth_offer,
            TierKey::ExhibitionFee => &mut self.exhibition_fee,
            TierKey::QuarterlyDiscount => &mut self.quarterly_discount,
            TierKey::AnnualDiscount => &mut self.annual_discount,
            TierKey::Iban => &mut self.iban,
            TierKey::Payee => &mut self.payee,
        }
    }
}
