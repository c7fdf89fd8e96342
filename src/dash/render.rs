// The view composer: turns a computed view into the JSON document consumed by the front end.
//
// Rows are passed through unchanged; this is only where titles, display
// names and colors are attached.

use std::collections::BTreeMap;

use hours_view::aggregates::{
    CapacityPie, CombinedTable, PieSlice, ProjectControlChart, SliceLabel,
};
use hours_view::melt::{value_columns, ProjectAuditorHours};
use hours_view::selection::{ViewMode, Visibility};
use hours_view::view::{ControlChart, DashboardView, EntityChart};

use crate::dash::*;

const SERIES_PALETTE: [&str; 5] = ["#522D6D", "#0091B3", "#702DB3", "#A7A4DF", "#F2BC73"];
const ENTITY_PALETTE: [&str; 5] = ["#941B80", "#0096AE", "#C3A454", "#0096AE", "#941B80"];
const REVIEW_TYPE_PALETTE: [&str; 2] = ["#2E4D2E", "#D65D72"];
const CONTROL_SCALE: [&str; 2] = ["#941B80", "#0096AE"];

/// The lookup tables from stable identifiers to presentation attributes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Presentation {
    pub series_colors: BTreeMap<String, String>,
    pub project_labels: BTreeMap<String, String>,
    pub entity_colors: Vec<String>,
    pub review_type_colors: Vec<String>,
}

impl Presentation {
    /// The default colors follow the order of the tracked auditors, then the
    /// remaining hours. The configuration overrides them one by one.
    pub fn new(config: &PresentationConfig, rules: &ViewRules) -> Presentation {
        let mut series_colors: BTreeMap<String, String> = value_columns(&rules.tracked_auditors)
            .iter()
            .zip(SERIES_PALETTE.iter().cycle())
            .map(|(s, c)| (s.id().to_string(), c.to_string()))
            .collect();
        if let Some(overrides) = &config.series_colors {
            series_colors.extend(overrides.clone());
        }
        Presentation {
            series_colors,
            project_labels: config.project_labels.clone().unwrap_or_default(),
            entity_colors: palette(&config.entity_colors, &ENTITY_PALETTE),
            review_type_colors: palette(&config.review_type_colors, &REVIEW_TYPE_PALETTE),
        }
    }

    /// The display name of a project: the configured label of its code, or the project itself.
    pub fn project_label(&self, project: &str) -> String {
        let code = hours_view::aggregates::project_code(project).unwrap_or(project);
        self.project_labels
            .get(project)
            .or_else(|| self.project_labels.get(code))
            .cloned()
            .unwrap_or_else(|| project.to_string())
    }
}

fn palette(colors: &Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    match colors {
        Some(c) => c.clone(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn mode_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Overview => "overview",
        ViewMode::AuditorFocus => "auditorFocus",
        ViewMode::ProjectFocus => "projectFocus",
        ViewMode::TableView => "tableView",
    }
}

fn visibility_js(v: &Visibility) -> JSValue {
    json!({
        "grid": v.grid,
        "projectPie": v.project_pie,
        "table": v.table,
        "auditorPies": v.auditor_pies,
    })
}

fn slices_js(slices: &[PieSlice], pres: &Presentation, projects: bool) -> Vec<JSValue> {
    slices
        .iter()
        .map(|s| {
            let label = match &s.label {
                SliceLabel::Named(n) if projects => pres.project_label(n),
                l => l.as_str().to_string(),
            };
            json!({"id": s.label.as_str(), "label": label, "value": s.value})
        })
        .collect()
}

fn capacity_pie_js(
    id: &str,
    title: &str,
    pie: &CapacityPie,
    pres: &Presentation,
    projects: bool,
) -> JSValue {
    json!({
        "id": id,
        "kind": "pie",
        "title": format!("{}: {}", title, pie.auditor),
        "capacity": pie.capacity,
        "incurred": pie.incurred,
        "available": pie.available,
        "slices": slices_js(&pie.slices, pres, projects),
    })
}

fn control_chart_js(chart: &ProjectControlChart, pres: &Presentation) -> JSValue {
    let y_range = chart.y_range.map(|(lo, hi)| json!([lo, hi]));
    match chart.variant {
        ControlChartVariant::Control => {
            let rows: Vec<JSValue> = chart
                .rows
                .iter()
                .map(|r| {
                    json!({
                        "project": r.project,
                        "label": pres.project_label(&r.project),
                        "control": r.control,
                    })
                })
                .collect();
            json!({
                "id": "grafico1",
                "kind": "bar",
                "title": "Control de Horas por Proyecto",
                "rows": rows,
                "yRange": y_range,
                "colorScale": CONTROL_SCALE,
            })
        }
        ControlChartVariant::Breakdown => {
            let rows: Vec<JSValue> = chart
                .breakdown()
                .iter()
                .map(|(project, part, hours)| {
                    json!({
                        "project": project,
                        "label": pres.project_label(project),
                        "series": part.id(),
                        "hours": hours,
                    })
                })
                .collect();
            json!({
                "id": "grafico1",
                "kind": "stackedBar",
                "title": "Control de Horas por Proyecto",
                "rows": rows,
                "yRange": y_range,
                "colors": pres.series_colors,
            })
        }
    }
}

fn stack_js(rows: &[ProjectAuditorHours], pres: &Presentation) -> JSValue {
    let rows_js: Vec<JSValue> = rows
        .iter()
        .map(|r| {
            json!({
                "project": r.project,
                "label": pres.project_label(&r.project),
                "series": r.series.id(),
                "hours": r.hours,
            })
        })
        .collect();
    json!({
        "id": "grafico4",
        "kind": "stackedBar",
        "title": "Horas por Proyecto y Auditor",
        "rows": rows_js,
        "colors": pres.series_colors,
    })
}

fn table_js(table: &CombinedTable) -> JSValue {
    let rows: Vec<JSValue> = table
        .rows
        .iter()
        .map(|r| {
            json!({
                "auditor": r.capacity.as_ref().map(|c| c.auditor.clone()),
                "availableHours": r.capacity.as_ref().map(|c| c.available_hours),
                "entity": r.budget.as_ref().map(|b| b.entity.clone()),
                "budgetedHours": r.budget.as_ref().map(|b| b.budgeted_hours),
            })
        })
        .collect();
    json!({
        "title": "Horas disponibles y presupuestadas",
        "columns": [
            {"id": "auditor", "name": "Integrante"},
            {"id": "availableHours", "name": "Horas disponibles para proyectos"},
            {"id": "entity", "name": "Entidad"},
            {"id": "budgetedHours", "name": "Horas Presupuestas*"},
        ],
        "rows": rows,
        "misaligned": table.misaligned,
    })
}

pub fn render_view(
    view: &DashboardView,
    pres: &Presentation,
    settings: &OutputSettings,
) -> JSValue {
    let chart1 = match &view.control {
        ControlChart::ProjectControl(c) => control_chart_js(c, pres),
        ControlChart::AuditorBudget(pie) => capacity_pie_js(
            "grafico1",
            "Horas Incurridas vs Disponibles por Proyecto",
            pie,
            pres,
            true,
        ),
    };

    let review_rows: Vec<JSValue> = view
        .entity_review
        .iter()
        .map(|r| {
            json!({
                "entity": r.entity,
                "reviewType": r.review_type,
                "hours": r.hours,
            })
        })
        .collect();
    let chart2 = json!({
        "id": "grafico2",
        "kind": "groupedBar",
        "title": "Horas por Empresa/Tipo Incurridas",
        "rows": review_rows,
        "colors": pres.review_type_colors,
    });

    let chart3 = match &view.entity {
        EntityChart::EntityBudget(slices) => json!({
            "id": "grafico3",
            "kind": "pie",
            "title": "Distribución de Horas Presupuestadas por Entidad",
            "slices": slices_js(slices, pres, false),
            "colors": pres.entity_colors,
        }),
        EntityChart::EntityIncurred(pie) => capacity_pie_js(
            "grafico3",
            "Horas Incurridas vs Disponibles por Entidad",
            pie,
            pres,
            false,
        ),
    };

    let chart4 = stack_js(&view.project_stack, pres);

    let project_pie = match (&view.project_pie, view.selection.project()) {
        (Some(slices), Some(project)) => json!({
            "id": "pie-proyecto",
            "kind": "pie",
            "title": format!("Distribución de Horas del Proyecto {}", pres.project_label(project)),
            "slices": slices_js(slices, pres, false),
            "colors": pres.series_colors,
        }),
        _ => JSValue::Null,
    };

    let table = view.table.as_ref().map(table_js).unwrap_or(JSValue::Null);

    json!({
        "dashboard": {
            "name": settings.dashboard_name,
            "subtitle": settings.subtitle,
        },
        "selection": {
            "auditor": view.selection.auditor(),
            "project": view.selection.project(),
            "showTable": view.selection.show_table,
        },
        "mode": mode_name(view.mode),
        "visibility": visibility_js(&view.visibility),
        "kpis": {
            "totalHours": view.kpis.total_hours,
            "records": view.kpis.record_count,
            "display": [
                format!("Total de horas: {}", view.kpis.total_hours_display()),
                format!("Registros: {}", view.kpis.record_count),
            ],
        },
        "charts": [chart1, chart2, chart3, chart4],
        "projectPie": project_pie,
        "table": table,
    })
}

/// The values of the filters.
pub fn render_options(ctx: &DataContext) -> JSValue {
    json!({
        "auditors": ctx.auditor_options(),
        "projects": ctx.project_options(),
    })
}
