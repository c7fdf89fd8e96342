//! The selection state machine.
//!
//! The display mode is a pure function of the current [`Selection`]: there is
//! no transition history. The precedence is, from highest to lowest:
//! table view, project focus, auditor focus, overview.

use log::debug;

use crate::config::Selection;

/// The mutually exclusive display modes.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ViewMode {
    Overview,
    AuditorFocus,
    ProjectFocus,
    TableView,
}

/// Which surfaces the view composer must show.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Visibility {
    /// The grid of the four charts.
    pub grid: bool,
    /// The pie of a single project.
    pub project_pie: bool,
    /// The combined capacity and budget table.
    pub table: bool,
    /// Charts 1 and 3 are drawn as incurred-vs-available pies.
    pub auditor_pies: bool,
}

/// The aggregate used by the first chart.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ControlBranch {
    ProjectControl,
    AuditorBudgetPie(String),
}

/// The aggregate used by the third chart.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum EntityBranch {
    EntityBudgetPie,
    EntityIncurredVsCapacityPie(String),
}

/// Everything the view computation needs to know about a selection.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ViewPlan {
    pub mode: ViewMode,
    pub visibility: Visibility,
    pub control: ControlBranch,
    pub entity: EntityBranch,
    /// The auditor filter of charts 2 and 4 and of the KPIs.
    pub auditor_filter: Option<String>,
    /// The project of the detail pie, if any.
    pub project: Option<String>,
    pub build_table: bool,
}

pub fn view_mode(selection: &Selection) -> ViewMode {
    if selection.show_table {
        ViewMode::TableView
    } else if selection.project.is_some() {
        ViewMode::ProjectFocus
    } else if selection.auditor.is_some() {
        ViewMode::AuditorFocus
    } else {
        ViewMode::Overview
    }
}

pub fn visibility(mode: ViewMode) -> Visibility {
    match mode {
        ViewMode::Overview => Visibility {
            grid: true,
            project_pie: false,
            table: false,
            auditor_pies: false,
        },
        ViewMode::AuditorFocus => Visibility {
            grid: true,
            project_pie: false,
            table: false,
            auditor_pies: true,
        },
        ViewMode::ProjectFocus => Visibility {
            grid: false,
            project_pie: true,
            table: false,
            auditor_pies: false,
        },
        ViewMode::TableView => Visibility {
            grid: false,
            project_pie: false,
            table: true,
            auditor_pies: false,
        },
    }
}

/// Plans the view for a selection.
///
/// The chart branches follow the auditor filter even when the grid is hidden,
/// so that the auditor and project filters compose.
pub fn plan(selection: &Selection) -> ViewPlan {
    let mode = view_mode(selection);
    let (control, entity) = match selection.auditor.clone() {
        Some(a) => (
            ControlBranch::AuditorBudgetPie(a.clone()),
            EntityBranch::EntityIncurredVsCapacityPie(a),
        ),
        None => (ControlBranch::ProjectControl, EntityBranch::EntityBudgetPie),
    };
    let res = ViewPlan {
        mode,
        visibility: visibility(mode),
        control,
        entity,
        auditor_filter: selection.auditor.clone(),
        project: selection.project.clone(),
        build_table: mode == ViewMode::TableView,
    };
    debug!("plan: {:?} -> {:?}", selection, res);
    res
}
