//! Multi-key ordering over goal and project rows.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Person, Space};
use crate::domain::error::{DomainError, DomainResult};

/// Column a sibling list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortKey {
    #[default]
    Name,
    Timeframe,
    LastCheckIn,
    Champion,
    Space,
    Progress,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        Self::Name,
        Self::Timeframe,
        Self::LastCheckIn,
        Self::Champion,
        Self::Space,
        Self::Progress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Timeframe => "timeframe",
            Self::LastCheckIn => "lastCheckIn",
            Self::Champion => "champion",
            Self::Space => "space",
            Self::Progress => "progress",
        }
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "timeframe" => Ok(Self::Timeframe),
            "lastCheckIn" | "last-check-in" | "last_check_in" => Ok(Self::LastCheckIn),
            "champion" => Ok(Self::Champion),
            "space" => Ok(Self::Space),
            "progress" => Ok(Self::Progress),
            other => Err(DomainError::UnsupportedSortKey(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Apply the direction to an ascending ordering.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(DomainError::UnsupportedSortDirection(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortDirection {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortDirection> for String {
    fn from(direction: SortDirection) -> Self {
        direction.as_str().to_string()
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities a row needs to take part in sorting.
///
/// Goal rows and project rows implement this separately since their notion
/// of timeframe differs; the remaining comparators are shared free functions.
pub trait SortableNode {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn champion(&self) -> &Person;
    fn space(&self) -> &Space;
    fn is_closed(&self) -> bool;
    /// Progress in percent
    fn progress(&self) -> f64;
    fn last_check_in(&self) -> Option<DateTime<Utc>>;
    fn timeframe_start(&self) -> Option<NaiveDate>;
    fn timeframe_end(&self) -> Option<NaiveDate>;

    /// Short description of what sits below this row, if anything.
    fn child_summary_label(&self) -> Option<String>;

    fn compare_timeframe(&self, other: &dyn SortableNode) -> Ordering;
}

/// Order `a` against `b` by `key`, then apply `direction`.
pub fn compare(
    a: &dyn SortableNode,
    b: &dyn SortableNode,
    key: SortKey,
    direction: SortDirection,
) -> DomainResult<Ordering> {
    let ordering = match key {
        SortKey::Name => compare_name(a, b),
        SortKey::Timeframe => a.compare_timeframe(b),
        SortKey::LastCheckIn => compare_last_check_in(a, b)?,
        SortKey::Champion => compare_champion(a, b),
        SortKey::Space => compare_space(a, b),
        SortKey::Progress => compare_progress(a, b),
    };
    Ok(direction.apply(ordering))
}

pub fn compare_name(a: &dyn SortableNode, b: &dyn SortableNode) -> Ordering {
    locale_compare(a.name(), b.name())
}

pub fn compare_champion(a: &dyn SortableNode, b: &dyn SortableNode) -> Ordering {
    locale_compare(&a.champion().full_name, &b.champion().full_name)
}

/// Chronological order of the last check-in. Both rows must have one.
pub fn compare_last_check_in(
    a: &dyn SortableNode,
    b: &dyn SortableNode,
) -> DomainResult<Ordering> {
    let left = required_check_in(a)?;
    let right = required_check_in(b)?;
    Ok(left.cmp(&right))
}

fn required_check_in(node: &dyn SortableNode) -> DomainResult<DateTime<Utc>> {
    node.last_check_in()
        .ok_or_else(|| DomainError::MissingRequiredField {
            id: node.id().to_string(),
            field: "last_check_in",
        })
}

/// Open rows before closed rows, open rows by numeric progress.
///
/// Two closed rows always report `Greater`, whichever side is asked.
pub fn compare_progress(a: &dyn SortableNode, b: &dyn SortableNode) -> Ordering {
    match (a.is_closed(), b.is_closed()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Greater,
        (false, false) => a.progress().total_cmp(&b.progress()),
    }
}

/// Company space first, then by space name.
///
/// The fallback compares `a`'s space name with `b`'s own name, not with
/// `b`'s space name.
pub fn compare_space(a: &dyn SortableNode, b: &dyn SortableNode) -> Ordering {
    match (a.space().is_company_space, b.space().is_company_space) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => locale_compare(&a.space().name, b.name()),
    }
}

/// Case-insensitive collation; on a tie lowercase sorts before uppercase,
/// then plain code point order decides.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}
