//! Property listing types: listing kind, image slots, lifecycle state, edit cooldown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a listing is offered for rent or for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rent => "RENT",
            Self::Sale => "SALE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RENT" => Some(Self::Rent),
            "SALE" => Some(Self::Sale),
            _ => None,
        }
    }
}

/// One of the five fixed image positions of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 5] = [
        ImageSlot::First,
        ImageSlot::Second,
        ImageSlot::Third,
        ImageSlot::Fourth,
        ImageSlot::Fifth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Fifth => "fifth",
        }
    }

    /// Object-storage key: `images/{property_id}/{slot}.jpeg`.
    pub fn object_key(self, property_id: impl fmt::Display) -> String {
        format!("images/{}/{}.jpeg", property_id, self.as_str())
    }
}

/// Lifecycle state derived from the `(is_draft, is_available)` flag pair.
///
/// | is_draft | is_available | state |
/// |---|---|---|
/// | true | true | Draft |
/// | false | true | Available |
/// | false | false | Paused |
/// | true | false | Deleted |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingState {
    Draft,
    Available,
    Paused,
    Deleted,
}

impl ListingState {
    pub fn from_flags(is_draft: bool, is_available: bool) -> Self {
        match (is_draft, is_available) {
            (true, true) => Self::Draft,
            (false, true) => Self::Available,
            (false, false) => Self::Paused,
            (true, false) => Self::Deleted,
        }
    }

    /// `(is_draft, is_available)` for this state.
    pub fn flags(self) -> (bool, bool) {
        match self {
            Self::Draft => (true, true),
            Self::Available => (false, true),
            Self::Paused => (false, false),
            Self::Deleted => (true, false),
        }
    }

    /// Publicly visible in search.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Default minimum interval between two form/image edits of one property.
pub const DEFAULT_EDIT_COOLDOWN_DAYS: i64 = 30;

/// Days left before the property may be edited again, or `None` if editing is allowed.
///
/// Whole elapsed days are counted, so an edit exactly `cooldown_days` after the last
/// one is accepted.
pub fn cooldown_days_left(
    last_update: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown_days: i64,
) -> Option<i64> {
    let elapsed = (now - last_update).num_days();
    if elapsed >= cooldown_days {
        None
    } else {
        Some(cooldown_days - elapsed.max(0))
    }
}

/// Longest whole-rupee part a price string may carry.
pub const MAX_PRICE_DIGITS: usize = 15;

/// Whether `price` is a displayable amount: digits with optional `,` or space
/// grouping and at most one `.` followed by one or two paise digits.
pub fn is_valid_price(price: &str) -> bool {
    let price = price.trim();
    let (whole, fraction) = match price.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (price, None),
    };
    let digits = whole.chars().filter(char::is_ascii_digit).count();
    let whole_ok = whole.starts_with(|c: char| c.is_ascii_digit())
        && whole.chars().all(|c| c.is_ascii_digit() || c == ',' || c == ' ')
        && (1..=MAX_PRICE_DIGITS).contains(&digits);
    let fraction_ok = fraction.is_none_or(|f| {
        (1..=2).contains(&f.len()) && f.chars().all(|c| c.is_ascii_digit())
    });
    whole_ok && fraction_ok
}
