//! Reshaping of the wide per-auditor columns into a long relation.

use std::fmt::Display;

use crate::config::REMAINING_SERIES;
use crate::derive::ProjectRecord;

/// A value column of the hours-control sheet, used as a stacking key.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub enum Series {
    Auditor(String),
    Remaining,
}

impl Series {
    /// The stable identifier of the series.
    pub fn id(&self) -> &str {
        match self {
            Series::Auditor(name) => name.as_str(),
            Series::Remaining => REMAINING_SERIES,
        }
    }

    pub fn is_auditor(&self, name: &str) -> bool {
        matches!(self, Series::Auditor(n) if n == name)
    }
}

impl Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One row of the long relation: the hours of a series on a project.
#[derive(PartialEq, Debug, Clone)]
pub struct ProjectAuditorHours {
    pub project: String,
    pub series: Series,
    pub hours: f64,
}

/// The value columns for the given tracked auditors: one per auditor, then the remaining hours.
pub fn value_columns(tracked_auditors: &[String]) -> Vec<Series> {
    let mut cols: Vec<Series> = tracked_auditors
        .iter()
        .map(|name| Series::Auditor(name.clone()))
        .collect();
    cols.push(Series::Remaining);
    cols
}

/// Melts the project records on the given value columns.
///
/// The output is ordered by value column first, then by project, and holds
/// exactly `records.len() * value_columns.len()` rows.
pub fn melt(records: &[ProjectRecord], value_columns: &[Series]) -> Vec<ProjectAuditorHours> {
    let mut res: Vec<ProjectAuditorHours> = Vec::with_capacity(records.len() * value_columns.len());
    for series in value_columns.iter() {
        for rec in records.iter() {
            let hours = match series {
                Series::Auditor(name) => rec.row.hours_of(name),
                Series::Remaining => rec.derived.remaining,
            };
            res.push(ProjectAuditorHours {
                project: rec.row.project.clone(),
                series: series.clone(),
                hours,
            });
        }
    }
    res
}
