// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The series identifier used for the unspent part of a project budget.
pub const REMAINING_SERIES: &str = "Horas presupuestadas restantes";

/// The slice holding the capacity that an auditor has not used yet.
pub const AVAILABLE_SLICE: &str = "Disponible";

/// Rows of the capacity sheet carrying this label are totals, not auditors.
pub const TOTAL_LABEL: &str = "Total";

/// One logged time record, as read from the time-control extract.
#[derive(PartialEq, Debug, Clone)]
pub struct TimeEntry {
    pub auditor: String,
    /// The audited company.
    pub entity: String,
    pub review_type: String,
    /// The audit or project the hours were logged against. May be empty.
    pub audit_or_project: String,
    pub hours: f64,
    /// The key of the audit in the annual plan. Empty when missing in the source.
    pub audit_key: String,
}

/// Hours budgeted for the fiscal year, per entity.
#[derive(PartialEq, Debug, Clone)]
pub struct BudgetedHours {
    pub entity: String,
    pub budgeted_hours: f64,
}

/// One project of the hours-control sheet.
#[derive(PartialEq, Debug, Clone)]
pub struct ProjectHoursRow {
    pub project: String,
    pub budgeted: f64,
    pub incurred: f64,
    /// The hours of each tracked auditor on this project, in column order.
    pub auditor_hours: Vec<(String, f64)>,
}

impl ProjectHoursRow {
    /// The hours of the given auditor on this project. Absent auditors count as zero.
    pub fn hours_of(&self, auditor: &str) -> f64 {
        self.auditor_hours
            .iter()
            .find(|(name, _)| name == auditor)
            .map(|(_, h)| *h)
            .unwrap_or(0.0)
    }
}

/// The total hours an auditor has available for project work.
#[derive(PartialEq, Debug, Clone)]
pub struct AuditorCapacity {
    pub auditor: String,
    pub available_hours: f64,
}

impl AuditorCapacity {
    pub fn is_total(&self) -> bool {
        self.auditor.trim().eq_ignore_ascii_case(TOTAL_LABEL)
    }
}

// ******** Selection *********

/// The filter choices of a user. This is the only input of a view computation.
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct Selection {
    pub auditor: Option<String>,
    pub project: Option<String>,
    pub show_table: bool,
}

impl Selection {
    pub fn new(auditor: Option<&str>, project: Option<&str>, show_table: bool) -> Selection {
        Selection {
            auditor: normalize_choice(auditor),
            project: normalize_choice(project),
            show_table,
        }
    }

    /// The cleared selection.
    pub fn overview() -> Selection {
        Selection::default()
    }

    pub fn auditor(&self) -> Option<&str> {
        self.auditor.as_deref()
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }
}

// A cleared dropdown may come back as an empty string.
fn normalize_choice(choice: Option<&str>) -> Option<String> {
    match choice.map(str::trim) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

// ********* Rules **********

/// How the control hours of a project with no budget are computed.
///
/// The extracts have been processed both ways over time, so the policy is
/// an explicit choice.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ZeroBudgetPolicy {
    /// `control = 0` when nothing was budgeted.
    Guarded,
    /// `control = budgeted - incurred`, always. An unbudgeted project then
    /// shows all of its incurred hours as overrun.
    Unconditional,
}

/// The form of the first chart when no auditor is selected.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ControlChartVariant {
    /// A single bar per project with the signed control hours.
    Control,
    /// Stacked bars per project: adjusted incurred, overrun and remaining hours.
    Breakdown,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ViewRules {
    /// Only entries whose audit key starts with this prefix are in scope.
    pub fiscal_year_prefix: String,
    /// Only entries of these auditors are in scope.
    pub auditor_whitelist: Vec<String>,
    /// The auditors that have a column in the hours-control sheet, in display order.
    pub tracked_auditors: Vec<String>,
    pub zero_budget_policy: ZeroBudgetPolicy,
    pub control_chart: ControlChartVariant,
}

impl Default for ViewRules {
    fn default() -> Self {
        ViewRules {
            fiscal_year_prefix: "AI-24".to_string(),
            auditor_whitelist: [
                "Carlos Alan Quiroz Herrera",
                "Guadalupe Ivonne Peñaloza Macías",
                "Ivette Arely Fragoso González",
                "Julio Abraham Cano Cruz",
                "María Guadalupe Bravo Varela",
                "Martha Jimena Portillo Gutiérrez",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            tracked_auditors: [
                "Carlos Alan Quiroz Herrera",
                "Guadalupe Ivonne Peñaloza Macías",
                "María Guadalupe Bravo Varela",
                "Martha Jimena Portillo Gutiérrez",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            zero_budget_policy: ZeroBudgetPolicy::Guarded,
            control_chart: ControlChartVariant::Control,
        }
    }
}

// ********* Errors **********

/// The base tables, used to report which one is unusable.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TableKind {
    TimeEntries,
    BudgetByEntity,
    ProjectHours,
    Capacity,
}

impl Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableKind::TimeEntries => "time entries",
            TableKind::BudgetByEntity => "budget by entity",
            TableKind::ProjectHours => "project hours",
            TableKind::Capacity => "auditor capacity",
        };
        write!(f, "{}", name)
    }
}

/// Errors that prevent a data context from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ViewErrors {
    /// A base table is missing or has no rows.
    EmptyTable(TableKind),
    /// The capacity table lists the same auditor more than once.
    DuplicateCapacity(String),
}

impl Error for ViewErrors {}

impl Display for ViewErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewErrors::EmptyTable(kind) => write!(f, "the {} table is empty", kind),
            ViewErrors::DuplicateCapacity(name) => {
                write!(
                    f,
                    "auditor {:?} appears more than once in the capacity table",
                    name
                )
            }
        }
    }
}
