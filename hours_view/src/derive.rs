//! Derived fields of the hours-control sheet.

use log::debug;

use crate::config::*;

/// The fields computed once per project from its budgeted and incurred hours.
///
/// Invariants: `remaining >= 0`, `overrun <= 0`, `remaining + overrun == control`
/// and `adjusted_incurred == incurred - |overrun|`.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct DerivedHours {
    pub control: f64,
    pub remaining: f64,
    pub overrun: f64,
    pub adjusted_incurred: f64,
}

/// A project row together with its derived fields.
#[derive(PartialEq, Debug, Clone)]
pub struct ProjectRecord {
    pub row: ProjectHoursRow,
    pub derived: DerivedHours,
}

pub fn derive_hours(budgeted: f64, incurred: f64, policy: ZeroBudgetPolicy) -> DerivedHours {
    let control = match policy {
        ZeroBudgetPolicy::Guarded if budgeted == 0.0 => 0.0,
        _ => budgeted - incurred,
    };
    let remaining = control.max(0.0);
    let overrun = control.min(0.0);
    DerivedHours {
        control,
        remaining,
        overrun,
        adjusted_incurred: incurred + overrun,
    }
}

/// Augments every project row with its derived fields.
pub fn derive_all(rows: &[ProjectHoursRow], policy: ZeroBudgetPolicy) -> Vec<ProjectRecord> {
    rows.iter()
        .map(|row| {
            let derived = derive_hours(row.budgeted, row.incurred, policy);
            debug!("derive_all: {:?} -> {:?}", row.project, derived);
            ProjectRecord {
                row: row.clone(),
                derived,
            }
        })
        .collect()
}
