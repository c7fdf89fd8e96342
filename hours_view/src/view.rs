//! One full recomputation of the dashboard for a selection.

use log::info;

use crate::aggregates::*;
use crate::config::Selection;
use crate::context::DataContext;
use crate::kpi::{kpi_summary, KpiSummary};
use crate::melt::ProjectAuditorHours;
use crate::selection::*;

/// Chart 1.
#[derive(PartialEq, Debug, Clone)]
pub enum ControlChart {
    ProjectControl(ProjectControlChart),
    AuditorBudget(CapacityPie),
}

/// Chart 3.
#[derive(PartialEq, Debug, Clone)]
pub enum EntityChart {
    EntityBudget(Vec<PieSlice>),
    EntityIncurred(CapacityPie),
}

/// All the result tables and visibility flags for one selection.
///
/// The four charts are always computed; the visibility flags decide what is
/// shown. The project pie and the table are only built when requested.
#[derive(PartialEq, Debug, Clone)]
pub struct DashboardView {
    pub selection: Selection,
    pub mode: ViewMode,
    pub visibility: Visibility,
    pub kpis: KpiSummary,
    pub control: ControlChart,
    pub entity_review: Vec<EntityReviewRow>,
    pub entity: EntityChart,
    pub project_stack: Vec<ProjectAuditorHours>,
    pub project_pie: Option<Vec<PieSlice>>,
    pub table: Option<CombinedTable>,
}

pub fn compute_view(ctx: &DataContext, selection: &Selection) -> DashboardView {
    let plan = plan(selection);
    info!("compute_view: {:?} -> {:?}", selection, plan.mode);
    let auditor = plan.auditor_filter.as_deref();

    let control = match &plan.control {
        ControlBranch::ProjectControl => ControlChart::ProjectControl(project_control(ctx)),
        ControlBranch::AuditorBudgetPie(a) => {
            ControlChart::AuditorBudget(auditor_budget_pie(ctx, a))
        }
    };
    let entity = match &plan.entity {
        EntityBranch::EntityBudgetPie => EntityChart::EntityBudget(entity_budget_pie(ctx)),
        EntityBranch::EntityIncurredVsCapacityPie(a) => {
            EntityChart::EntityIncurred(entity_incurred_vs_capacity_pie(ctx, a))
        }
    };

    DashboardView {
        selection: selection.clone(),
        mode: plan.mode,
        visibility: plan.visibility,
        kpis: kpi_summary(ctx, auditor),
        control,
        entity_review: entity_review_type(ctx, auditor),
        entity,
        project_stack: project_auditor_stack(ctx, auditor),
        project_pie: plan.project.as_deref().map(|p| project_detail_pie(ctx, p)),
        table: if plan.build_table {
            Some(combined_capacity_table(ctx))
        } else {
            None
        },
    }
}
