// A small data context shared by the unit tests.

use crate::builder::ContextBuilder;
use crate::config::*;
use crate::context::DataContext;

pub const CARLOS: &str = "Carlos Alan Quiroz Herrera";
pub const MARTHA: &str = "Martha Jimena Portillo Gutiérrez";
pub const IVETTE: &str = "Ivette Arely Fragoso González";
pub const JULIO: &str = "Julio Abraham Cano Cruz";

fn entry(auditor: &str, entity: &str, review: &str, key: &str, hours: f64) -> TimeEntry {
    TimeEntry {
        auditor: auditor.to_string(),
        entity: entity.to_string(),
        review_type: review.to_string(),
        audit_or_project: key.to_string(),
        hours,
        audit_key: key.to_string(),
    }
}

fn project(name: &str, budgeted: f64, incurred: f64, hours: &[(&str, f64)]) -> ProjectHoursRow {
    ProjectHoursRow {
        project: name.to_string(),
        budgeted,
        incurred,
        auditor_hours: hours.iter().map(|(a, h)| (a.to_string(), *h)).collect(),
    }
}

fn capacity(auditor: &str, hours: f64) -> AuditorCapacity {
    AuditorCapacity {
        auditor: auditor.to_string(),
        available_hours: hours,
    }
}

fn budget(entity: &str, hours: f64) -> BudgetedHours {
    BudgetedHours {
        entity: entity.to_string(),
        budgeted_hours: hours,
    }
}

pub fn sample_builder() -> ContextBuilder {
    ContextBuilder::new(&ViewRules::default())
        .time_entries(vec![
            entry(CARLOS, "Banco", "Auditoría", "AI-24-001", 10.0),
            entry(CARLOS, "Banco", "Seguimiento", "AI-24-001", 5.5),
            entry(CARLOS, "Seguros", "Auditoría", "AI-24-004", 20.0),
            entry(MARTHA, "Seguros", "Auditoría", "AI-24-004", 8.0),
            entry(IVETTE, "Banco", "Auditoría", "AI-24-002", 4.0),
            // Out of scope: previous fiscal year, unknown auditor, no key.
            entry(JULIO, "Banco", "Auditoría", "AI-23-010", 7.0),
            entry("Otro Auditor", "Banco", "Auditoría", "AI-24-001", 3.0),
            entry(JULIO, "Banco", "Auditoría", "", 2.0),
        ])
        .budget_by_entity(vec![
            budget("Banco", 300.0),
            budget("Seguros", 200.0),
            budget("Banco", 50.0),
        ])
        .project_hours(vec![
            project("AI-24-001", 100.0, 15.5, &[(CARLOS, 15.5)]),
            project("AI-24-004", 20.0, 28.0, &[(CARLOS, 20.0), (MARTHA, 8.0)]),
            project("AI-24-002", 0.0, 4.0, &[]),
            project("AI-24-007 Seguimiento TI", 10.0, 0.0, &[]),
        ])
        .capacity(vec![
            capacity(CARLOS, 30.0),
            capacity(MARTHA, 1000.0),
            capacity("Guadalupe Ivonne Peñaloza Macías", 500.0),
            capacity("Total", 1530.0),
        ])
        .entity_budget(vec![budget("Banco", 350.0), budget("Seguros", 200.0)])
}

pub fn sample_context() -> DataContext {
    sample_builder().build().expect("sample context")
}
