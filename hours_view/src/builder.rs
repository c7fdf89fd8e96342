pub use crate::config::*;

use std::collections::HashSet;

use log::info;

use crate::context::{is_in_scope, DataContext};
use crate::derive::derive_all;
use crate::melt::{melt, value_columns};

/// A builder for the data context.
///
/// All four base tables must be provided and non-empty: a context is never
/// built from partially loaded data.
///
/// ```
/// use hours_view::builder::ContextBuilder;
/// use hours_view::*;
///
/// let ctx = ContextBuilder::new(&ViewRules::default())
///     .time_entries(vec![TimeEntry {
///         auditor: "Julio Abraham Cano Cruz".to_string(),
///         entity: "Banco".to_string(),
///         review_type: "Auditoría".to_string(),
///         audit_or_project: "AI-24-001".to_string(),
///         hours: 8.0,
///         audit_key: "AI-24-001".to_string(),
///     }])
///     .budget_by_entity(vec![BudgetedHours {
///         entity: "Banco".to_string(),
///         budgeted_hours: 120.0,
///     }])
///     .project_hours(vec![ProjectHoursRow {
///         project: "AI-24-001".to_string(),
///         budgeted: 100.0,
///         incurred: 8.0,
///         auditor_hours: vec![],
///     }])
///     .capacity(vec![AuditorCapacity {
///         auditor: "Julio Abraham Cano Cruz".to_string(),
///         available_hours: 900.0,
///     }])
///     .build()?;
///
/// assert_eq!(ctx.in_scope_entries().len(), 1);
/// # Ok::<(), ViewErrors>(())
/// ```
pub struct ContextBuilder {
    pub(crate) _rules: ViewRules,
    pub(crate) _time_entries: Vec<TimeEntry>,
    pub(crate) _budget_by_entity: Vec<BudgetedHours>,
    pub(crate) _project_hours: Vec<ProjectHoursRow>,
    pub(crate) _capacity: Vec<AuditorCapacity>,
    pub(crate) _entity_budget: Vec<BudgetedHours>,
}

impl ContextBuilder {
    pub fn new(rules: &ViewRules) -> ContextBuilder {
        ContextBuilder {
            _rules: rules.clone(),
            _time_entries: Vec::new(),
            _budget_by_entity: Vec::new(),
            _project_hours: Vec::new(),
            _capacity: Vec::new(),
            _entity_budget: Vec::new(),
        }
    }

    pub fn time_entries(mut self, entries: Vec<TimeEntry>) -> ContextBuilder {
        self._time_entries = entries;
        self
    }

    pub fn budget_by_entity(mut self, budget: Vec<BudgetedHours>) -> ContextBuilder {
        self._budget_by_entity = budget;
        self
    }

    pub fn project_hours(mut self, rows: Vec<ProjectHoursRow>) -> ContextBuilder {
        self._project_hours = rows;
        self
    }

    pub fn capacity(mut self, capacity: Vec<AuditorCapacity>) -> ContextBuilder {
        self._capacity = capacity;
        self
    }

    /// The budget-per-entity columns of the capacity sheet, shown in the combined table.
    pub fn entity_budget(mut self, budget: Vec<BudgetedHours>) -> ContextBuilder {
        self._entity_budget = budget;
        self
    }

    /// Checks the base tables, then computes the derived tables once.
    pub fn build(self) -> Result<DataContext, ViewErrors> {
        if self._time_entries.is_empty() {
            return Err(ViewErrors::EmptyTable(TableKind::TimeEntries));
        }
        if self._budget_by_entity.is_empty() {
            return Err(ViewErrors::EmptyTable(TableKind::BudgetByEntity));
        }
        if self._project_hours.is_empty() {
            return Err(ViewErrors::EmptyTable(TableKind::ProjectHours));
        }
        if self._capacity.is_empty() {
            return Err(ViewErrors::EmptyTable(TableKind::Capacity));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for c in self._capacity.iter().filter(|c| !c.is_total()) {
            if !seen.insert(c.auditor.as_str()) {
                return Err(ViewErrors::DuplicateCapacity(c.auditor.clone()));
            }
        }

        let rules = self._rules;
        let entry_count = self._time_entries.len();
        let in_scope: Vec<TimeEntry> = self
            ._time_entries
            .into_iter()
            .filter(|e| is_in_scope(e, &rules))
            .collect();
        let projects = derive_all(&self._project_hours, rules.zero_budget_policy);
        let project_auditor_hours = melt(&projects, &value_columns(&rules.tracked_auditors));

        info!(
            "Data context: {} of {} time entries in scope (prefix {:?}), {} projects, {} project/series rows, {} capacity rows",
            in_scope.len(),
            entry_count,
            rules.fiscal_year_prefix,
            projects.len(),
            project_auditor_hours.len(),
            self._capacity.len()
        );

        Ok(DataContext {
            rules,
            entry_count,
            in_scope,
            budget_by_entity: self._budget_by_entity,
            projects,
            project_auditor_hours,
            capacity: self._capacity,
            entity_budget: self._entity_budget,
        })
    }
}
