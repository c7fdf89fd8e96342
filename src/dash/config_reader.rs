use std::collections::{BTreeMap, HashMap};

use crate::dash::*;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName", default = "default_dashboard_name")]
    pub dashboard_name: String,
    #[serde(rename = "subtitle")]
    pub subtitle: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

fn default_dashboard_name() -> String {
    "Dashboard de Control de Tiempos".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            dashboard_name: default_dashboard_name(),
            subtitle: Some("Filtrado por auditorías del Plan Anual 2024".to_string()),
            output_path: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// One of `timeEntries`, `budgetByEntity`, `projectHours`, `capacity`.
    pub table: String,
    /// `xlsx` or `csv`.
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
    #[serde(rename = "dropLastRow")]
    pub drop_last_row: Option<bool>,
    /// Overrides of the column names, by logical name.
    #[serde(rename = "columnNames")]
    pub column_names: Option<HashMap<String, String>>,
}

impl FileSource {
    pub fn table_kind(&self) -> DashResult<TableKind> {
        match self.table.as_str() {
            "timeEntries" => Ok(TableKind::TimeEntries),
            "budgetByEntity" => Ok(TableKind::BudgetByEntity),
            "projectHours" => Ok(TableKind::ProjectHours),
            "capacity" => Ok(TableKind::Capacity),
            _ => UnknownTableSnafu {
                table: self.table.clone(),
            }
            .fail(),
        }
    }

    /// The name of a column in the source, falling back to the usual header.
    pub fn column(&self, logical: &str, default: &str) -> String {
        self.column_names
            .as_ref()
            .and_then(|m| m.get(logical))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// The budget workbook ends with a total row, which is dropped by default.
    pub fn drops_last_row(&self) -> bool {
        match self.drop_last_row {
            Some(b) => b,
            None => self.table == "budgetByEntity",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "fiscalYearPrefix")]
    pub fiscal_year_prefix: Option<String>,
    #[serde(rename = "auditorWhitelist")]
    pub auditor_whitelist: Option<Vec<String>>,
    #[serde(rename = "trackedAuditors")]
    pub tracked_auditors: Option<Vec<String>>,
    #[serde(rename = "zeroBudgetPolicy")]
    pub zero_budget_policy: Option<String>,
    #[serde(rename = "controlChart")]
    pub control_chart: Option<String>,
}

impl RulesConfig {
    pub fn view_rules(&self) -> DashResult<ViewRules> {
        let defaults = ViewRules::default();
        let zero_budget_policy = match self.zero_budget_policy.as_deref() {
            None | Some("guarded") => ZeroBudgetPolicy::Guarded,
            Some("unconditional") => ZeroBudgetPolicy::Unconditional,
            Some(x) => whatever!("unknown zero budget policy: {:?}", x),
        };
        let control_chart = match self.control_chart.as_deref() {
            None | Some("control") => ControlChartVariant::Control,
            Some("breakdown") => ControlChartVariant::Breakdown,
            Some(x) => whatever!("unknown control chart: {:?}", x),
        };
        Ok(ViewRules {
            fiscal_year_prefix: self
                .fiscal_year_prefix
                .clone()
                .unwrap_or(defaults.fiscal_year_prefix),
            auditor_whitelist: self
                .auditor_whitelist
                .clone()
                .unwrap_or(defaults.auditor_whitelist),
            tracked_auditors: self
                .tracked_auditors
                .clone()
                .unwrap_or(defaults.tracked_auditors),
            zero_budget_policy,
            control_chart,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Color of each stacking series, by auditor name or remaining-hours label.
    #[serde(rename = "seriesColors")]
    pub series_colors: Option<BTreeMap<String, String>>,
    /// Display name of each project code.
    #[serde(rename = "projectLabels")]
    pub project_labels: Option<BTreeMap<String, String>>,
    #[serde(rename = "entityColors")]
    pub entity_colors: Option<Vec<String>>,
    #[serde(rename = "reviewTypeColors")]
    pub review_type_colors: Option<Vec<String>>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    pub sources: Vec<FileSource>,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

impl DashboardConfig {
    /// The source of a table. Every table must have exactly one.
    pub fn source(&self, kind: TableKind) -> DashResult<&FileSource> {
        let mut found: Option<&FileSource> = None;
        for cfs in self.sources.iter() {
            if cfs.table_kind()? == kind {
                if found.is_some() {
                    whatever!("more than one source for the {} table", kind);
                }
                found = Some(cfs);
            }
        }
        found.context(MissingSourceSnafu {
            table: kind.to_string(),
        })
    }
}

/// A change of the filters, as found in an events file.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub auditor: Option<String>,
    pub project: Option<String>,
    #[serde(rename = "showTable", default)]
    pub show_table: bool,
}

impl SelectionEvent {
    pub fn selection(&self) -> Selection {
        Selection::new(
            self.auditor.as_deref(),
            self.project.as_deref(),
            self.show_table,
        )
    }
}

pub fn read_config(path: &str) -> DashResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashboardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_events(path: &str) -> DashResult<Vec<Selection>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let events: Vec<SelectionEvent> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(events.iter().map(|e| e.selection()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "sources": [
            {"table": "timeEntries", "provider": "xlsx", "filePath": "Control de tiempos.xlsx"},
            {"table": "budgetByEntity", "provider": "xlsx", "filePath": "Libro 2.xlsx"},
            {"table": "projectHours", "provider": "csv", "filePath": "Datos.csv",
             "columnNames": {"project": "Proyecto"}},
            {"table": "capacity", "provider": "xlsx", "filePath": "Horas_auditor.xlsx",
             "worksheetName": "Hoja1"}
        ]
    }"#;

    #[test]
    fn defaults() {
        let config: DashboardConfig = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(config.output_settings, OutputSettings::default());
        assert_eq!(config.rules.view_rules().unwrap(), ViewRules::default());
        let budget = config.source(TableKind::BudgetByEntity).unwrap();
        assert!(budget.drops_last_row());
        let projects = config.source(TableKind::ProjectHours).unwrap();
        assert!(!projects.drops_last_row());
        assert_eq!(projects.column("project", "Proyectos"), "Proyecto");
        let budgeted = projects.column("budgeted", "Horas presupuestadas");
        assert_eq!(budgeted, "Horas presupuestadas");
    }

    #[test]
    fn rules_overrides() {
        let rules: RulesConfig = serde_json::from_str(
            r#"{
                "fiscalYearPrefix": "AI-25",
                "zeroBudgetPolicy": "unconditional",
                "controlChart": "breakdown"
            }"#,
        )
        .unwrap();
        let r = rules.view_rules().unwrap();
        assert_eq!(r.fiscal_year_prefix, "AI-25");
        assert_eq!(r.zero_budget_policy, ZeroBudgetPolicy::Unconditional);
        assert_eq!(r.control_chart, ControlChartVariant::Breakdown);
        assert_eq!(r.tracked_auditors.len(), 4);
    }

    #[test]
    fn bad_rules() {
        let rules = RulesConfig {
            zero_budget_policy: Some("sometimes".to_string()),
            ..RulesConfig::default()
        };
        assert!(rules.view_rules().is_err());
    }

    #[test]
    fn missing_and_unknown_sources() {
        let mut config: DashboardConfig = serde_json::from_str(MINIMAL).unwrap();
        config.sources.retain(|s| s.table != "capacity");
        assert!(matches!(
            config.source(TableKind::Capacity),
            Err(DashError::MissingSource { .. })
        ));
        config.sources[0].table = "ledger".to_string();
        assert!(matches!(
            config.source(TableKind::Capacity),
            Err(DashError::UnknownTable { .. })
        ));
    }

    #[test]
    fn events() {
        let events: Vec<SelectionEvent> = serde_json::from_str(
            r#"[{}, {"auditor": "Julio Abraham Cano Cruz"}, {"project": "", "showTable": true}]"#,
        )
        .unwrap();
        let sels: Vec<Selection> = events.iter().map(|e| e.selection()).collect();
        assert_eq!(sels[0], Selection::overview());
        assert_eq!(sels[1].auditor(), Some("Julio Abraham Cano Cruz"));
        assert_eq!(sels[2], Selection::new(None, None, true));
    }
}
