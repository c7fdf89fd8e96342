//! The aggregate builders, one per chart.
//!
//! Every builder is a pure function of the data context and the active
//! filters. An empty filter result gives an empty result, and a missing
//! lookup (an auditor without capacity, an unknown project) gives zeros
//! or an empty result rather than an error.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;

use crate::config::*;
use crate::context::DataContext;
use crate::melt::ProjectAuditorHours;

/// The label of a pie slice.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub enum SliceLabel {
    /// A project code, an entity or an auditor.
    Named(String),
    /// The capacity left to an auditor.
    Available,
    /// The unspent budget of a project.
    Remaining,
}

impl SliceLabel {
    pub fn as_str(&self) -> &str {
        match self {
            SliceLabel::Named(s) => s.as_str(),
            SliceLabel::Available => AVAILABLE_SLICE,
            SliceLabel::Remaining => REMAINING_SERIES,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct PieSlice {
    pub label: SliceLabel,
    pub value: f64,
}

impl PieSlice {
    fn named(label: &str, value: f64) -> PieSlice {
        PieSlice {
            label: SliceLabel::Named(label.to_string()),
            value,
        }
    }
}

/// Incurred hours of an auditor against the capacity.
///
/// The slices hold one entry per group, then the available hours. They sum
/// to `max(capacity, incurred)`.
#[derive(PartialEq, Debug, Clone)]
pub struct CapacityPie {
    pub auditor: String,
    pub slices: Vec<PieSlice>,
    pub capacity: f64,
    pub incurred: f64,
    pub available: f64,
}

impl CapacityPie {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ProjectControlRow {
    pub project: String,
    pub control: f64,
    pub adjusted_incurred: f64,
    pub overrun: f64,
    pub remaining: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ProjectControlChart {
    pub variant: ControlChartVariant,
    pub rows: Vec<ProjectControlRow>,
    /// The value axis, padded by 10% beyond the extreme control values.
    /// `None` when there is no row.
    pub y_range: Option<(f64, f64)>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EntityReviewRow {
    pub entity: String,
    pub review_type: String,
    pub hours: f64,
}

/// One line of the combined table. Either side may be missing when the two
/// source tables have different lengths.
#[derive(PartialEq, Debug, Clone)]
pub struct CombinedRow {
    pub capacity: Option<AuditorCapacity>,
    pub budget: Option<BudgetedHours>,
}

/// The capacity table and the budget-per-entity table side by side.
///
/// The two tables share no key: rows are paired by position. `misaligned`
/// is set when the lengths differ, in which case the shorter side is padded
/// with empty cells.
#[derive(PartialEq, Debug, Clone)]
pub struct CombinedTable {
    pub rows: Vec<CombinedRow>,
    pub misaligned: bool,
}

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"AI-\d{2}-\d{3}").expect("valid project code pattern"))
}

/// Extracts the `AI-YY-NNN` project code from a label.
pub fn project_code(label: &str) -> Option<&str> {
    code_pattern().find(label).map(|m| m.as_str())
}

// The project an entry is charged to. Entries without a recognizable code
// are kept under their audit key.
fn entry_project(entry: &TimeEntry) -> String {
    project_code(&entry.audit_or_project)
        .or_else(|| project_code(&entry.audit_key))
        .unwrap_or(entry.audit_key.as_str())
        .to_string()
}

fn sum_by<K: Ord, I: Iterator<Item = (K, f64)>>(items: I) -> BTreeMap<K, f64> {
    let mut res: BTreeMap<K, f64> = BTreeMap::new();
    for (k, v) in items {
        *res.entry(k).or_insert(0.0) += v;
    }
    res
}

/// Chart 1, no auditor selected: control hours per project.
pub fn project_control(ctx: &DataContext) -> ProjectControlChart {
    let mut grouped: BTreeMap<&str, ProjectControlRow> = BTreeMap::new();
    for rec in ctx.projects() {
        let row = grouped
            .entry(rec.row.project.as_str())
            .or_insert_with(|| ProjectControlRow {
                project: rec.row.project.clone(),
                control: 0.0,
                adjusted_incurred: 0.0,
                overrun: 0.0,
                remaining: 0.0,
            });
        row.control += rec.derived.control;
        row.adjusted_incurred += rec.derived.adjusted_incurred;
        row.overrun += rec.derived.overrun;
        row.remaining += rec.derived.remaining;
    }
    let rows: Vec<ProjectControlRow> = grouped.into_values().collect();
    let y_range = padded_range(rows.iter().map(|r| r.control));
    ProjectControlChart {
        variant: ctx.rules().control_chart,
        rows,
        y_range,
    }
}

fn padded_range<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for v in values {
        range = Some(match range {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    range.map(|(lo, hi)| (lo - 0.1 * lo.abs(), hi + 0.1 * hi.abs()))
}

fn capacity_pie<F: Fn(&TimeEntry) -> String>(
    ctx: &DataContext,
    auditor: &str,
    group_key: F,
) -> CapacityPie {
    let entries = ctx.entries_for(Some(auditor));
    let grouped = sum_by(entries.map(|e| (group_key(e), e.hours)));
    let incurred: f64 = grouped.values().sum();
    let capacity = match ctx.capacity_of(auditor) {
        Some(c) => c,
        None => {
            debug!("capacity_pie: no capacity for {:?}, using 0", auditor);
            0.0
        }
    };
    let available = (capacity - incurred).max(0.0);
    let mut slices: Vec<PieSlice> = grouped
        .iter()
        .map(|(k, v)| PieSlice::named(k, *v))
        .collect();
    slices.push(PieSlice {
        label: SliceLabel::Available,
        value: available,
    });
    CapacityPie {
        auditor: auditor.to_string(),
        slices,
        capacity,
        incurred,
        available,
    }
}

/// Chart 1, auditor selected: incurred hours per project against the capacity.
pub fn auditor_budget_pie(ctx: &DataContext, auditor: &str) -> CapacityPie {
    capacity_pie(ctx, auditor, entry_project)
}

/// Chart 2: in-scope hours per entity and review type.
pub fn entity_review_type(ctx: &DataContext, auditor: Option<&str>) -> Vec<EntityReviewRow> {
    sum_by(
        ctx.entries_for(auditor)
            .map(|e| ((e.entity.clone(), e.review_type.clone()), e.hours)),
    )
    .into_iter()
    .map(|((entity, review_type), hours)| EntityReviewRow {
        entity,
        review_type,
        hours,
    })
    .collect()
}

/// Chart 3, no auditor selected: budgeted hours per entity.
pub fn entity_budget_pie(ctx: &DataContext) -> Vec<PieSlice> {
    sum_by(
        ctx.budget_by_entity()
            .iter()
            .map(|b| (b.entity.as_str(), b.budgeted_hours)),
    )
    .into_iter()
    .map(|(entity, hours)| PieSlice::named(entity, hours))
    .collect()
}

/// Chart 3, auditor selected: incurred hours per entity against the capacity.
pub fn entity_incurred_vs_capacity_pie(ctx: &DataContext, auditor: &str) -> CapacityPie {
    capacity_pie(ctx, auditor, |e| e.entity.clone())
}

/// Chart 4: hours per project, stacked by auditor and remaining budget.
///
/// With an auditor, only the segments of that auditor are kept.
pub fn project_auditor_stack(ctx: &DataContext, auditor: Option<&str>) -> Vec<ProjectAuditorHours> {
    ctx.project_auditor_hours()
        .iter()
        .filter(|r| auditor.map_or(true, |a| r.series.is_auditor(a)))
        .cloned()
        .collect()
}

/// The pie of a single project: the hours of each tracked auditor, then the
/// remaining budget if there is any.
///
/// The project is matched on its full label first, then on its code.
pub fn project_detail_pie(ctx: &DataContext, project: &str) -> Vec<PieSlice> {
    let rec = ctx
        .projects()
        .iter()
        .find(|p| p.row.project == project)
        .or_else(|| {
            ctx.projects()
                .iter()
                .find(|p| project_code(&p.row.project) == Some(project))
        });
    let rec = match rec {
        Some(r) => r,
        None => {
            debug!("project_detail_pie: no project {:?}", project);
            return Vec::new();
        }
    };
    let mut slices: Vec<PieSlice> = ctx
        .rules()
        .tracked_auditors
        .iter()
        .map(|a| PieSlice::named(a, rec.row.hours_of(a)))
        .collect();
    if rec.derived.remaining > 0.0 {
        slices.push(PieSlice {
            label: SliceLabel::Remaining,
            value: rec.derived.remaining,
        });
    }
    slices
}

/// The capacity table and the budget-per-entity table, paired by position.
pub fn combined_capacity_table(ctx: &DataContext) -> CombinedTable {
    let capacity = ctx.capacity_table();
    let budget = ctx.entity_budget_table();
    let misaligned = capacity.len() != budget.len();
    if misaligned {
        warn!(
            "combined_capacity_table: {} capacity rows but {} budget rows, rows are paired by position",
            capacity.len(),
            budget.len()
        );
    }
    let rows = (0..capacity.len().max(budget.len()))
        .map(|idx| CombinedRow {
            capacity: capacity.get(idx).cloned(),
            budget: budget.get(idx).cloned(),
        })
        .collect();
    CombinedTable { rows, misaligned }
}

/// A stacked part of a project in the breakdown variant of chart 1.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ControlPart {
    /// The incurred hours, capped at the budget.
    Incurred,
    /// The hours beyond the budget, as a negative value.
    Overrun,
    Remaining,
}

impl ControlPart {
    pub fn id(&self) -> &'static str {
        match self {
            ControlPart::Incurred => "Horas Incurridas",
            ControlPart::Overrun => "Horas excedidas",
            ControlPart::Remaining => REMAINING_SERIES,
        }
    }
}

impl ProjectControlChart {
    /// The long form of the chart for the breakdown variant: three parts per project.
    pub fn breakdown(&self) -> Vec<(String, ControlPart, f64)> {
        let mut res: Vec<(String, ControlPart, f64)> = Vec::with_capacity(self.rows.len() * 3);
        for part in [
            ControlPart::Incurred,
            ControlPart::Overrun,
            ControlPart::Remaining,
        ] {
            for row in self.rows.iter() {
                let hours = match part {
                    ControlPart::Incurred => row.adjusted_incurred,
                    ControlPart::Overrun => row.overrun,
                    ControlPart::Remaining => row.remaining,
                };
                res.push((row.project.clone(), part, hours));
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn code_extraction() {
        assert_eq!(project_code("AI-24-004"), Some("AI-24-004"));
        assert_eq!(project_code("AI-24-007 Seguimiento TI"), Some("AI-24-007"));
        assert_eq!(project_code("Proyecto AI-23-100"), Some("AI-23-100"));
        assert_eq!(project_code("AI-2-004"), None);
        assert_eq!(project_code(""), None);
    }

    #[test]
    fn control_per_project() {
        let chart = project_control(&sample_context());
        let projects: Vec<&str> = chart.rows.iter().map(|r| r.project.as_str()).collect();
        assert_eq!(
            projects,
            vec![
                "AI-24-001",
                "AI-24-002",
                "AI-24-004",
                "AI-24-007 Seguimiento TI"
            ]
        );
        assert_eq!(chart.rows[0].control, 84.5);
        assert_eq!(chart.rows[1].control, 0.0);
        assert_eq!(chart.rows[2].control, -8.0);
        assert_eq!(chart.rows[2].overrun, -8.0);
        assert_eq!(chart.rows[2].adjusted_incurred, 20.0);
        let (lo, hi) = chart.y_range.unwrap();
        assert!(close(lo, -8.8));
        assert!(close(hi, 92.95));
    }

    #[test]
    fn control_breakdown_parts() {
        let chart = project_control(&sample_context());
        let parts = chart.breakdown();
        assert_eq!(parts.len(), chart.rows.len() * 3);
        let find = |project: &str, part: ControlPart| {
            parts
                .iter()
                .find(|(p, k, _)| p == project && *k == part)
                .map(|(_, _, h)| *h)
        };
        assert_eq!(find("AI-24-004", ControlPart::Incurred), Some(20.0));
        assert_eq!(find("AI-24-004", ControlPart::Overrun), Some(-8.0));
        assert_eq!(find("AI-24-004", ControlPart::Remaining), Some(0.0));
        assert_eq!(find("AI-24-001", ControlPart::Remaining), Some(84.5));
    }

    #[test]
    fn control_range_positive_minimum() {
        assert_eq!(padded_range([10.0, 20.0].into_iter()), Some((9.0, 22.0)));
        assert_eq!(padded_range(std::iter::empty()), None);
    }

    #[test]
    fn auditor_pie_within_capacity() {
        let pie = auditor_budget_pie(&sample_context(), MARTHA);
        assert_eq!(
            pie.slices,
            vec![
                PieSlice::named("AI-24-004", 8.0),
                PieSlice {
                    label: SliceLabel::Available,
                    value: 992.0
                },
            ]
        );
        assert_eq!(pie.total(), pie.capacity);
    }

    #[test]
    fn auditor_pie_over_capacity() {
        let pie = auditor_budget_pie(&sample_context(), CARLOS);
        assert_eq!(pie.capacity, 30.0);
        assert_eq!(pie.incurred, 35.5);
        assert_eq!(pie.available, 0.0);
        assert_eq!(pie.slices.len(), 3);
        assert_eq!(pie.slices[0], PieSlice::named("AI-24-001", 15.5));
        assert_eq!(pie.slices[1], PieSlice::named("AI-24-004", 20.0));
        assert_eq!(pie.total(), pie.capacity.max(pie.incurred));
    }

    #[test]
    fn scenario_e_missing_capacity() {
        let pie = auditor_budget_pie(&sample_context(), IVETTE);
        assert_eq!(pie.capacity, 0.0);
        assert_eq!(pie.available, 0.0);
        assert_eq!(
            pie.slices.last().map(|s| s.label.clone()),
            Some(SliceLabel::Available)
        );
        assert_eq!(pie.total(), 4.0);
    }

    #[test]
    fn auditor_pie_without_entries() {
        let pie = auditor_budget_pie(&sample_context(), "Nadie");
        assert_eq!(pie.incurred, 0.0);
        assert_eq!(pie.slices.len(), 1);
        assert_eq!(pie.total(), 0.0);
    }

    #[test]
    fn entity_review_grouping() {
        let ctx = sample_context();
        let all = entity_review_type(&ctx, None);
        assert_eq!(
            all,
            vec![
                EntityReviewRow {
                    entity: "Banco".to_string(),
                    review_type: "Auditoría".to_string(),
                    hours: 14.0
                },
                EntityReviewRow {
                    entity: "Banco".to_string(),
                    review_type: "Seguimiento".to_string(),
                    hours: 5.5
                },
                EntityReviewRow {
                    entity: "Seguros".to_string(),
                    review_type: "Auditoría".to_string(),
                    hours: 28.0
                },
            ]
        );
        let martha = entity_review_type(&ctx, Some(MARTHA));
        assert_eq!(martha.len(), 1);
        assert_eq!(martha[0].hours, 8.0);
        assert!(entity_review_type(&ctx, Some("Nadie")).is_empty());
    }

    #[test]
    fn entity_budget_grouping() {
        let slices = entity_budget_pie(&sample_context());
        assert_eq!(
            slices,
            vec![
                PieSlice::named("Banco", 350.0),
                PieSlice::named("Seguros", 200.0)
            ]
        );
    }

    #[test]
    fn entity_pie_for_auditor() {
        let pie = entity_incurred_vs_capacity_pie(&sample_context(), CARLOS);
        assert_eq!(pie.slices[0], PieSlice::named("Banco", 15.5));
        assert_eq!(pie.slices[1], PieSlice::named("Seguros", 20.0));
        assert_eq!(pie.available, 0.0);
        assert_eq!(pie.total(), 35.5);
    }

    #[test]
    fn stack_filters_on_auditor() {
        let ctx = sample_context();
        assert_eq!(project_auditor_stack(&ctx, None).len(), 4 * 5);
        let martha = project_auditor_stack(&ctx, Some(MARTHA));
        assert_eq!(martha.len(), 4);
        assert!(martha.iter().all(|r| r.series.is_auditor(MARTHA)));
        assert!(project_auditor_stack(&ctx, Some(IVETTE)).is_empty());
    }

    #[test]
    fn scenario_c_project_pie() {
        let ctx = sample_context();
        let slices = project_detail_pie(&ctx, "AI-24-004");
        let values: Vec<(&str, f64)> = slices
            .iter()
            .map(|s| (s.label.as_str(), s.value))
            .collect();
        assert_eq!(
            values,
            vec![
                (CARLOS, 20.0),
                ("Guadalupe Ivonne Peñaloza Macías", 0.0),
                ("María Guadalupe Bravo Varela", 0.0),
                (MARTHA, 8.0),
            ]
        );
        let with_remaining = project_detail_pie(&ctx, "AI-24-001");
        assert_eq!(with_remaining.len(), 5);
        assert_eq!(
            with_remaining.last(),
            Some(&PieSlice {
                label: SliceLabel::Remaining,
                value: 84.5
            })
        );
    }

    #[test]
    fn project_pie_by_code() {
        let slices = project_detail_pie(&sample_context(), "AI-24-007");
        assert_eq!(slices.len(), 5);
        assert_eq!(slices[4].value, 10.0);
    }

    #[test]
    fn project_pie_unknown_project() {
        assert!(project_detail_pie(&sample_context(), "AI-99-999").is_empty());
    }

    #[test]
    fn combined_table_by_position() {
        let table = combined_capacity_table(&sample_context());
        assert!(table.misaligned);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(
            table.rows[0].capacity.as_ref().map(|c| c.auditor.as_str()),
            Some(CARLOS)
        );
        assert_eq!(
            table.rows[0].budget.as_ref().map(|b| b.entity.as_str()),
            Some("Banco")
        );
        assert!(table.rows[3].budget.is_none());
        assert!(table.rows[3].capacity.is_some());
    }

    #[test]
    fn builders_are_idempotent() {
        let ctx = sample_context();
        assert_eq!(project_control(&ctx), project_control(&ctx));
        assert_eq!(
            auditor_budget_pie(&ctx, CARLOS),
            auditor_budget_pie(&ctx, CARLOS)
        );
        assert_eq!(
            entity_review_type(&ctx, None),
            entity_review_type(&ctx, None)
        );
        assert_eq!(entity_budget_pie(&ctx), entity_budget_pie(&ctx));
        assert_eq!(
            entity_incurred_vs_capacity_pie(&ctx, MARTHA),
            entity_incurred_vs_capacity_pie(&ctx, MARTHA)
        );
        assert_eq!(
            project_auditor_stack(&ctx, Some(CARLOS)),
            project_auditor_stack(&ctx, Some(CARLOS))
        );
        assert_eq!(
            project_detail_pie(&ctx, "AI-24-001"),
            project_detail_pie(&ctx, "AI-24-001")
        );
        assert_eq!(combined_capacity_table(&ctx), combined_capacity_table(&ctx));
    }
}
