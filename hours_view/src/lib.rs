mod config;

pub mod aggregates;
pub mod builder;
pub mod context;
pub mod derive;
pub mod kpi;
pub mod manual;
pub mod melt;
pub mod selection;
pub mod view;

#[cfg(test)]
mod fixtures;

pub use crate::config::*;
pub use crate::context::DataContext;
pub use crate::view::{compute_view, DashboardView};

#[cfg(test)]
mod tests {
    use super::builder::ContextBuilder;
    use super::fixtures::*;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn scope_filter() {
        init();
        let ctx = sample_context();
        assert_eq!(ctx.entry_count(), 8);
        assert_eq!(ctx.in_scope_entries().len(), 5);
        assert!(ctx
            .in_scope_entries()
            .iter()
            .all(|e| e.audit_key.starts_with("AI-24")));
        assert_eq!(ctx.auditor_options(), vec![CARLOS, MARTHA, IVETTE]);
    }

    #[test]
    fn derived_tables() {
        init();
        let ctx = sample_context();
        assert_eq!(ctx.projects().len(), 4);
        for p in ctx.projects() {
            assert!(p.derived.remaining >= 0.0);
            assert!(p.derived.overrun <= 0.0);
        }
        // Four tracked auditors plus the remaining hours.
        assert_eq!(ctx.project_auditor_hours().len(), 4 * 5);
    }

    #[test]
    fn capacity_lookup_skips_totals() {
        let ctx = sample_context();
        assert_eq!(ctx.capacity_of(MARTHA), Some(1000.0));
        assert_eq!(ctx.capacity_of("Total"), None);
        assert_eq!(ctx.capacity_of(IVETTE), None);
    }

    #[test]
    fn missing_tables_are_fatal() {
        init();
        let err = sample_builder().capacity(vec![]).build();
        assert_eq!(err, Err(ViewErrors::EmptyTable(TableKind::Capacity)));
        let err = sample_builder().time_entries(vec![]).build();
        assert_eq!(err, Err(ViewErrors::EmptyTable(TableKind::TimeEntries)));
        let err = ContextBuilder::new(&ViewRules::default()).build();
        assert!(err.is_err());
    }

    #[test]
    fn duplicate_capacity_is_fatal() {
        let dup = vec![
            AuditorCapacity {
                auditor: CARLOS.to_string(),
                available_hours: 1.0,
            },
            AuditorCapacity {
                auditor: CARLOS.to_string(),
                available_hours: 2.0,
            },
        ];
        let err = sample_builder().capacity(dup).build();
        assert_eq!(err, Err(ViewErrors::DuplicateCapacity(CARLOS.to_string())));
    }
}
