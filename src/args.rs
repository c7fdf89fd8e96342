use clap::Parser;

/// Computes the charts and tables of the time-control dashboard for a filter selection.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON configuration file listing the four source extracts.
    /// Paths of the sources are relative to the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (auditor name, optional) Restricts the view to one auditor.
    #[clap(short, long, value_parser)]
    pub auditor: Option<String>,

    /// (project code, optional) Shows the detail of one project, for example AI-24-004.
    #[clap(short, long, value_parser)]
    pub project: Option<String>,

    /// If passed as an argument, shows the combined capacity and budget table instead of the charts.
    #[clap(long, takes_value = false)]
    pub show_table: bool,

    /// (file path, optional) A JSON array of selections, processed one after the other.
    /// Each selection has the optional fields `auditor`, `project` and `showTable`.
    /// Setting this option overrides --auditor, --project and --show-table.
    #[clap(short, long, value_parser)]
    pub events: Option<String>,

    /// (file path, 'stdout' or empty) Where the rendered view is written in JSON format.
    /// Setting this option overrides the path that may be specified in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing an expected view in JSON format. If provided,
    /// the computed view is checked against it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, prints the available auditors and projects and exits.
    #[clap(long, takes_value = false)]
    pub list_options: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
