//! Normalization of the standings document.
//!
//! The standings endpoint has returned two layouts over the years: one group
//! per division (top-N per division qualify), and division leaders plus
//! conference wildcard groups. Both are a list of groups, each holding a
//! list of team records, so both are turned into the same group × slot grid
//! here and nowhere else.

use serde_json::Value;
use std::fmt;

use crate::error::{Result, StatsError};
use crate::table::flatten::{flatten_records, kind_of};

/// Which standings layout a document used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsLayout {
    /// Division leaders plus wildcard groups (`divisionLeaders` / `wildCard`).
    WildCard,
    /// One group per division or conference (`byDivision`, `regularSeason`, ...).
    Division,
    /// No `standingsType` on the groups.
    Unlabelled,
}

impl StandingsLayout {
    fn from_standings_type(kind: Option<&str>) -> Self {
        match kind {
            Some("wildCard") | Some("divisionLeaders") | Some("wildCardWithLeaders") => {
                StandingsLayout::WildCard
            }
            Some(_) => StandingsLayout::Division,
            None => StandingsLayout::Unlabelled,
        }
    }
}

impl fmt::Display for StandingsLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StandingsLayout::WildCard => "wildcard-with-leaders",
            StandingsLayout::Division => "division",
            StandingsLayout::Unlabelled => "unlabelled",
        };
        write!(f, "{s}")
    }
}

/// Team records laid out as groups (rows) by slots (columns).
///
/// Groups shorter than the widest one are padded with empty cells.
#[derive(Debug, Clone, PartialEq)]
pub struct QualificationGrid {
    pub layout: StandingsLayout,
    groups: Vec<Vec<Option<Value>>>,
    width: usize,
}

impl QualificationGrid {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Every cell that carries data, as `(group, slot, record)`.
    pub fn populated_cells(&self) -> impl Iterator<Item = (usize, usize, &Value)> {
        self.groups.iter().enumerate().flat_map(|(g, slots)| {
            slots
                .iter()
                .enumerate()
                .filter_map(move |(s, cell)| cell.as_ref().map(|v| (g, s, v)))
        })
    }
}

/// Turn a standings document into a [`QualificationGrid`].
///
/// Expects `records[*].teamRecords[*]`; a missing `records` list or a group
/// without a `teamRecords` list is a ShapeMismatch. Null team records count
/// as empty cells.
pub fn normalize_standings(doc: &Value) -> Result<QualificationGrid> {
    let records = flatten_records(doc, "records")?;

    let mut layout = None;
    let mut groups = Vec::with_capacity(records.len());

    for (idx, record) in records.rows.iter().enumerate() {
        let this_layout = StandingsLayout::from_standings_type(
            record.get("standingsType").and_then(Value::as_str),
        );
        layout.get_or_insert(this_layout);

        let path = format!("records[{idx}].teamRecords");
        let slots = match record.get("teamRecords") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|cell| match cell {
                    Value::Null => None,
                    other => Some(other.clone()),
                })
                .collect::<Vec<_>>(),
            Some(other) => {
                return Err(StatsError::shape(
                    path,
                    format!("expected an array, found {}", kind_of(other)),
                ))
            }
            None => return Err(StatsError::shape(path, "missing key `teamRecords`")),
        };
        groups.push(slots);
    }

    let width = groups.iter().map(Vec::len).max().unwrap_or(0);
    for slots in &mut groups {
        slots.resize(width, None);
    }

    Ok(QualificationGrid {
        layout: layout.unwrap_or(StandingsLayout::Unlabelled),
        groups,
        width,
    })
}
