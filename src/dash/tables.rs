// Typed rows from the raw sheets.

use crate::dash::io_common::{cell_at, read_number, read_text, RawTable};
use crate::dash::*;

// Columns of the time-control extract
pub const AUDITOR: (&str, &str) = ("auditor", "Auditor");
pub const ENTITY: (&str, &str) = ("entity", "Empresa");
pub const REVIEW_TYPE: (&str, &str) = ("reviewType", "Tipo de revisión");
pub const AUDIT_OR_PROJECT: (&str, &str) = ("auditOrProject", "Auditoría o proyecto");
pub const HOURS: (&str, &str) = ("hours", "Horas");
pub const AUDIT_KEY: (&str, &str) = ("auditKey", "Clave de la Auditoria");

// Columns of the budget workbook
pub const BUDGET_ENTITY: (&str, &str) = ("entity", "Entidad");
pub const BUDGET_HOURS: (&str, &str) = ("budgetedHours", "Horas Presupuestadas en 2024");

// Columns of the hours-control sheet. The auditors' columns are named after them.
pub const PROJECT: (&str, &str) = ("project", "Proyectos");
pub const BUDGETED: (&str, &str) = ("budgeted", "Horas presupuestadas");
pub const INCURRED: (&str, &str) = ("incurred", "Horas Incurridas");

// Columns of the capacity sheet
pub const MEMBER: (&str, &str) = ("auditor", "Integrante");
pub const AVAILABLE_HOURS: (&str, &str) = ("availableHours", "Horas disponibles para proyectos");
pub const CAPACITY_ENTITY: (&str, &str) = ("entity", "Entidad");
pub const CAPACITY_BUDGET: (&str, &str) = ("budgetedHours", "Horas Presupuestas*");

fn column_name(cfs: &FileSource, col: (&str, &str)) -> String {
    cfs.column(col.0, col.1)
}

// Data lines start right after the header.
fn lineno(idx: usize) -> usize {
    idx + 2
}

pub fn read_time_entries(table: &RawTable, cfs: &FileSource) -> DashResult<Vec<TimeEntry>> {
    let auditor_c = column_name(cfs, AUDITOR);
    let entity_c = column_name(cfs, ENTITY);
    let review_c = column_name(cfs, REVIEW_TYPE);
    let hours_c = column_name(cfs, HOURS);
    let key_c = column_name(cfs, AUDIT_KEY);
    let auditor_idx = table.require_column(&auditor_c)?;
    let entity_idx = table.require_column(&entity_c)?;
    let review_idx = table.require_column(&review_c)?;
    let hours_idx = table.require_column(&hours_c)?;
    let key_idx = table.require_column(&key_c)?;
    // Older extracts do not have this column.
    let project_c = column_name(cfs, AUDIT_OR_PROJECT);
    let project_idx = table.column_index(&project_c);
    if project_idx.is_none() {
        debug!(
            "read_time_entries: no {:?} column in {}",
            project_c, table.path
        );
    }

    let mut res: Vec<TimeEntry> = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let l = lineno(idx);
        let text = |i: usize, c: &str| -> DashResult<String> {
            Ok(read_text(cell_at(row, i), l, c)?.unwrap_or_default())
        };
        let audit_or_project = match project_idx {
            Some(i) => text(i, &project_c)?,
            None => "".to_string(),
        };
        let entry = TimeEntry {
            auditor: text(auditor_idx, &auditor_c)?,
            entity: text(entity_idx, &entity_c)?,
            review_type: text(review_idx, &review_c)?,
            audit_or_project,
            hours: read_number(cell_at(row, hours_idx), l, &hours_c)?.unwrap_or(0.0),
            audit_key: text(key_idx, &key_c)?,
        };
        res.push(entry);
    }
    Ok(res)
}

pub fn read_budget_by_entity(table: &RawTable, cfs: &FileSource) -> DashResult<Vec<BudgetedHours>> {
    let entity_c = column_name(cfs, BUDGET_ENTITY);
    let hours_c = column_name(cfs, BUDGET_HOURS);
    let entity_idx = table.require_column(&entity_c)?;
    let hours_idx = table.require_column(&hours_c)?;

    let mut res: Vec<BudgetedHours> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let l = lineno(idx);
        let entity = match read_text(cell_at(row, entity_idx), l, &entity_c)? {
            Some(e) => e,
            None => {
                warn!(
                    "read_budget_by_entity: {}: line {}: no entity, skipping",
                    table.path, l
                );
                continue;
            }
        };
        let budgeted_hours = read_number(cell_at(row, hours_idx), l, &hours_c)?.unwrap_or(0.0);
        res.push(BudgetedHours {
            entity,
            budgeted_hours,
        });
    }
    Ok(res)
}

pub fn read_project_hours(
    table: &RawTable,
    cfs: &FileSource,
    tracked_auditors: &[String],
) -> DashResult<Vec<ProjectHoursRow>> {
    let project_c = column_name(cfs, PROJECT);
    let budgeted_c = column_name(cfs, BUDGETED);
    let incurred_c = column_name(cfs, INCURRED);
    let project_idx = table.require_column(&project_c)?;
    let budgeted_idx = table.require_column(&budgeted_c)?;
    let incurred_idx = table.require_column(&incurred_c)?;

    // A tracked auditor without a column has no hours on any project.
    let mut auditor_cols: Vec<(String, String, Option<usize>)> = Vec::new();
    for name in tracked_auditors.iter() {
        let c = cfs.column(name, name);
        let i = table.column_index(&c);
        if i.is_none() {
            warn!(
                "read_project_hours: {}: no column for tracked auditor {:?}",
                table.path, name
            );
        }
        auditor_cols.push((name.clone(), c, i));
    }

    let mut res: Vec<ProjectHoursRow> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let l = lineno(idx);
        let project = match read_text(cell_at(row, project_idx), l, &project_c)? {
            Some(p) => p,
            None => {
                warn!(
                    "read_project_hours: {}: line {}: no project, skipping",
                    table.path, l
                );
                continue;
            }
        };
        let mut auditor_hours: Vec<(String, f64)> = Vec::with_capacity(auditor_cols.len());
        for (name, c, i) in auditor_cols.iter() {
            let h = match i {
                Some(i) => read_number(cell_at(row, *i), l, c)?.unwrap_or(0.0),
                None => 0.0,
            };
            auditor_hours.push((name.clone(), h));
        }
        res.push(ProjectHoursRow {
            project,
            budgeted: read_number(cell_at(row, budgeted_idx), l, &budgeted_c)?.unwrap_or(0.0),
            incurred: read_number(cell_at(row, incurred_idx), l, &incurred_c)?.unwrap_or(0.0),
            auditor_hours,
        });
    }
    Ok(res)
}

/// Reads the two lists of the capacity sheet. A row is kept in a list only
/// when both of the list's cells are filled, independently of the other list.
pub fn read_capacity(
    table: &RawTable,
    cfs: &FileSource,
) -> DashResult<(Vec<AuditorCapacity>, Vec<BudgetedHours>)> {
    let member_c = column_name(cfs, MEMBER);
    let available_c = column_name(cfs, AVAILABLE_HOURS);
    let entity_c = column_name(cfs, CAPACITY_ENTITY);
    let budget_c = column_name(cfs, CAPACITY_BUDGET);
    let member_idx = table.require_column(&member_c)?;
    let available_idx = table.require_column(&available_c)?;
    let entity_idx = table.column_index(&entity_c);
    let budget_idx = table.column_index(&budget_c);

    let mut capacity: Vec<AuditorCapacity> = Vec::new();
    let mut budget: Vec<BudgetedHours> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let l = lineno(idx);
        let member = read_text(cell_at(row, member_idx), l, &member_c)?;
        let available = read_number(cell_at(row, available_idx), l, &available_c)?;
        if let (Some(auditor), Some(available_hours)) = (member, available) {
            capacity.push(AuditorCapacity {
                auditor,
                available_hours,
            });
        }
        if let (Some(ei), Some(bi)) = (entity_idx, budget_idx) {
            let entity = read_text(cell_at(row, ei), l, &entity_c)?;
            let hours = read_number(cell_at(row, bi), l, &budget_c)?;
            if let (Some(entity), Some(budgeted_hours)) = (entity, hours) {
                budget.push(BudgetedHours {
                    entity,
                    budgeted_hours,
                });
            }
        }
    }
    if entity_idx.is_none() || budget_idx.is_none() {
        warn!(
            "read_capacity: {}: no {:?}/{:?} columns, the combined table has no budget side",
            table.path, entity_c, budget_c
        );
    }
    Ok((capacity, budget))
}
