// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Row predicate: decides whether a ticket row passes the active filters.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime};

use crate::{FilterKind, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    Week,
    Month,
    /// `any` and every unrecognized value.
    Any,
}

impl DateRange {
    /// Empty input means no date constraint at all.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => None,
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => Some(Self::Any),
        }
    }

    /// Earliest accepted row timestamp, measured from local midnight of `today`.
    pub fn cutoff(self, today: Date) -> Option<PrimitiveDateTime> {
        let start = match self {
            Self::Today => today,
            Self::Week => today.checked_sub(Duration::days(7)).unwrap_or(Date::MIN),
            Self::Month => one_month_before(today),
            Self::Any => return None,
        };
        Some(start.midnight())
    }
}

/// Same day of the previous month, clamped to that month's last day.
fn one_month_before(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::January => (date.year() - 1, Month::December),
        other => (date.year(), other.previous()),
    };
    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .unwrap_or(Date::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub range: DateRange,
    pub cutoff: Option<PrimitiveDateTime>,
}

impl DateWindow {
    pub fn new(range: DateRange, today: Date) -> Self {
        Self {
            range,
            cutoff: range.cutoff(today),
        }
    }

    fn admits(&self, raw: Option<&str>) -> bool {
        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            return false;
        };
        match (self.cutoff, parse_row_timestamp(raw)) {
            (None, _) => true,
            (Some(cutoff), Some(stamp)) => stamp >= cutoff,
            (Some(_), None) => false,
        }
    }
}

/// How a categorical filter treats a row that lacks the attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAttributePolicy {
    #[default]
    Exclude,
    Include,
}

impl MissingAttributePolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::Include => "include",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exclude" => Some(Self::Exclude),
            "include" => Some(Self::Include),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterPolicy {
    pub status: MissingAttributePolicy,
    pub priority: MissingAttributePolicy,
    pub department: MissingAttributePolicy,
    pub technician: MissingAttributePolicy,
}

/// Filter values for one table, rebuilt from its controls on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Criteria {
    pub search: String,
    pub status: String,
    pub priority: String,
    pub department: String,
    pub technician: String,
    pub date: Option<DateWindow>,
    pub policy: FilterPolicy,
}

impl Criteria {
    /// Builds criteria from whatever controls exist; `value_of` returns
    /// `None` for an absent control.
    pub fn from_controls<'a, F>(value_of: F, today: Date, policy: FilterPolicy) -> Self
    where
        F: Fn(FilterKind) -> Option<&'a str>,
    {
        let text = |kind| value_of(kind).unwrap_or_default().to_owned();
        Self {
            search: text(FilterKind::Search).to_lowercase(),
            status: text(FilterKind::Status),
            priority: text(FilterKind::Priority),
            department: text(FilterKind::Department),
            technician: text(FilterKind::Technician),
            date: value_of(FilterKind::Date)
                .and_then(DateRange::parse)
                .map(|range| DateWindow::new(range, today)),
            policy,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty()
            && self.status.is_empty()
            && self.priority.is_empty()
            && self.department.is_empty()
            && self.technician.is_empty()
            && self.date.is_none()
    }
}

pub fn matches(row: &Row, criteria: &Criteria) -> bool {
    let policy = criteria.policy;
    matches_text(&row.text(), &criteria.search)
        && matches_category(row.status.as_deref(), &criteria.status, policy.status)
        && matches_category(row.priority.as_deref(), &criteria.priority, policy.priority)
        && matches_category(
            row.department.as_deref(),
            &criteria.department,
            policy.department,
        )
        && matches_category(
            row.technician.as_deref(),
            &criteria.technician,
            policy.technician,
        )
        && criteria
            .date
            .is_none_or(|window| window.admits(row.date.as_deref()))
}

/// `needle` is expected to be lowercased already.
pub fn matches_text(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

fn matches_category(value: Option<&str>, wanted: &str, policy: MissingAttributePolicy) -> bool {
    if wanted.is_empty() {
        return true;
    }
    match value.filter(|value| !value.is_empty()) {
        Some(value) => value == wanted,
        None => policy == MissingAttributePolicy::Include,
    }
}

/// Parses the timestamp formats the server renders into `data-date`.
///
/// Offsets on RFC 3339 input are dropped: the wall-clock reading is compared
/// against local midnight.
pub fn parse_row_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight());
    }
    if let Ok(stamp) = OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339)
    {
        return Some(PrimitiveDateTime::new(stamp.date(), stamp.time()));
    }

    let whole_seconds = match raw.find('.') {
        Some(index) if index > 10 => &raw[..index],
        _ => raw,
    };
    let normalized = whole_seconds.replacen('T', " ", 1);
    PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            &normalized,
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
        )
    })
    .ok()
}
