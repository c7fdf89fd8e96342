use crate::context::DataContext;

/// The two headline numbers of the dashboard.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct KpiSummary {
    pub total_hours: f64,
    pub record_count: usize,
}

impl KpiSummary {
    /// The total hours rounded to two decimals, for display.
    pub fn total_hours_display(&self) -> String {
        format!("{:.2}", self.total_hours)
    }
}

/// Sums the in-scope entries of the selected auditor, or of everyone.
///
/// Only the auditor filter applies: the project and table choices never
/// change the KPIs.
pub fn kpi_summary(ctx: &DataContext, auditor: Option<&str>) -> KpiSummary {
    let mut total_hours = 0.0;
    let mut record_count = 0;
    for e in ctx.entries_for(auditor) {
        total_hours += e.hours;
        record_count += 1;
    }
    KpiSummary {
        total_hours,
        record_count,
    }
}
