use std::collections::HashSet;

use crate::config::*;
use crate::derive::ProjectRecord;
use crate::melt::ProjectAuditorHours;

/// The immutable base and derived tables, built once before serving.
///
/// Nothing mutates a context after [`crate::builder::ContextBuilder::build`]:
/// every aggregate borrows it and produces its own result rows, so a context
/// can be shared freely between concurrent readers.
#[derive(PartialEq, Debug, Clone)]
pub struct DataContext {
    pub(crate) rules: ViewRules,
    pub(crate) entry_count: usize,
    pub(crate) in_scope: Vec<TimeEntry>,
    pub(crate) budget_by_entity: Vec<BudgetedHours>,
    pub(crate) projects: Vec<ProjectRecord>,
    pub(crate) project_auditor_hours: Vec<ProjectAuditorHours>,
    pub(crate) capacity: Vec<AuditorCapacity>,
    pub(crate) entity_budget: Vec<BudgetedHours>,
}

impl DataContext {
    pub fn rules(&self) -> &ViewRules {
        &self.rules
    }

    /// The number of time entries before the scope filter.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// The time entries of whitelisted auditors within the fiscal year.
    pub fn in_scope_entries(&self) -> &[TimeEntry] {
        &self.in_scope
    }

    /// The in-scope entries of one auditor, or all of them.
    pub fn entries_for<'a>(
        &'a self,
        auditor: Option<&'a str>,
    ) -> impl Iterator<Item = &'a TimeEntry> + 'a {
        self.in_scope
            .iter()
            .filter(move |e| auditor.map_or(true, |a| e.auditor == a))
    }

    /// The hours budgeted for the year, per entity.
    pub fn budget_by_entity(&self) -> &[BudgetedHours] {
        &self.budget_by_entity
    }

    /// The projects with their derived fields.
    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    /// The long (project, series, hours) relation.
    pub fn project_auditor_hours(&self) -> &[ProjectAuditorHours] {
        &self.project_auditor_hours
    }

    /// The capacity rows, as listed in the source.
    pub fn capacity_table(&self) -> &[AuditorCapacity] {
        &self.capacity
    }

    /// The budget-per-entity rows of the capacity sheet.
    pub fn entity_budget_table(&self) -> &[BudgetedHours] {
        &self.entity_budget
    }

    /// The capacity of an auditor. Total rows are never matched.
    pub fn capacity_of(&self, auditor: &str) -> Option<f64> {
        self.capacity
            .iter()
            .filter(|c| !c.is_total())
            .find(|c| c.auditor == auditor)
            .map(|c| c.available_hours)
    }

    /// The distinct in-scope auditors, in order of first appearance.
    pub fn auditor_options(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.in_scope
            .iter()
            .filter(|e| seen.insert(e.auditor.as_str()))
            .map(|e| e.auditor.clone())
            .collect()
    }

    /// The distinct projects of the hours-control sheet, in sheet order.
    pub fn project_options(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.projects
            .iter()
            .filter(|p| seen.insert(p.row.project.as_str()))
            .map(|p| p.row.project.clone())
            .collect()
    }
}

/// Whether an entry belongs to the working subset.
pub fn is_in_scope(entry: &TimeEntry, rules: &ViewRules) -> bool {
    let prefix = rules.fiscal_year_prefix.as_str();
    rules.auditor_whitelist.iter().any(|a| *a == entry.auditor)
        && entry.audit_key.starts_with(prefix)
}
