use crate::report::{run_company, run_export, run_lookup, run_report};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use training_tracker::config::AppConfig;
use training_tracker::error::AppError;
use training_tracker::workflows::training::{RosterFilter, TopicSelection};

#[derive(Parser, Debug)]
#[command(
    name = "training-tracker",
    about = "Track work-at-height and confined-space training progress from a roster workbook",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the progress dashboard for the filtered roster
    Report(ReportArgs),
    /// Show the training detail of one person
    Lookup(LookupArgs),
    /// Drill into a single company
    Company(CompanyArgs),
    /// Write the filtered roster with derived status columns as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the roster file served by the API
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

/// Roster location and filter flags shared by the reporting commands.
#[derive(Args, Debug, Clone)]
pub(crate) struct RosterArgs {
    /// Roster workbook or CSV (overrides APP_ROSTER_PATH)
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Zero-based row holding the column headers (overrides APP_ROSTER_HEADER_ROW)
    #[arg(long)]
    pub(crate) header_row: Option<usize>,
    /// Topics to include: both, ta or ec
    #[arg(long, default_value = "both")]
    pub(crate) topic: TopicSelection,
    /// Only include this staff type (repeatable)
    #[arg(long = "staff-type")]
    pub(crate) staff_types: Vec<String>,
    /// Only include this company (repeatable)
    #[arg(long = "company")]
    pub(crate) companies: Vec<String>,
    /// Case-insensitive match on id or name
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Treat any number in a date column as a completed date
    #[arg(long)]
    pub(crate) lenient_numeric_dates: bool,
}

impl RosterArgs {
    pub(crate) fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.roster {
            config.roster.path = path.clone();
        }
        if let Some(header_row) = self.header_row {
            config.roster.header_row = header_row;
        }
        if self.lenient_numeric_dates {
            config.classification = config.classification.clone().with_numeric_date_threshold(None);
        }
    }

    /// Repeatable flags left unset mean "everything".
    pub(crate) fn filter(&self) -> RosterFilter {
        let selection = |values: &[String]| {
            (!values.is_empty()).then(|| values.iter().cloned().collect::<BTreeSet<_>>())
        };

        RosterFilter {
            topic: self.topic,
            staff_types: selection(&self.staff_types),
            companies: selection(&self.companies),
            search: self.search.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
    /// Also print the per-person listing
    #[arg(long)]
    pub(crate) list: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub(crate) struct LookupTarget {
    /// Person id (DNI)
    #[arg(long)]
    pub(crate) id: Option<String>,
    /// Full name, case-insensitive
    #[arg(long)]
    pub(crate) name: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    #[command(flatten)]
    pub(crate) target: LookupTarget,
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CompanyArgs {
    /// Company to drill into
    #[arg(long)]
    pub(crate) name: String,
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination file; stdout when omitted
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Lookup(args) => run_lookup(args),
        Command::Company(args) => run_company(args),
        Command::Export(args) => run_export(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("training-tracker").chain(args.iter().copied()))
            .expect("arguments parse")
            .command
            .expect("subcommand present")
    }

    #[test]
    fn repeatable_filters_build_sets() {
        let Command::Report(args) = parse(&[
            "report",
            "--company",
            "Acme",
            "--company",
            "Beta",
            "--topic",
            "ec",
        ]) else {
            panic!("expected report command");
        };

        let filter = args.roster.filter();
        assert_eq!(filter.topic, TopicSelection::ConfinedSpaces);
        assert_eq!(filter.companies.expect("companies").len(), 2);
        assert!(filter.staff_types.is_none());
    }

    #[test]
    fn lookup_requires_exactly_one_target() {
        let base = ["training-tracker", "lookup"];
        assert!(Cli::try_parse_from(base).is_err());
        assert!(Cli::try_parse_from([&base[..], &["--id", "1", "--name", "Ana"][..]].concat()).is_err());

        let Command::Lookup(args) = parse(&["lookup", "--name", "Perez, Juan"]) else {
            panic!("expected lookup command");
        };
        assert_eq!(args.target.name.as_deref(), Some("Perez, Juan"));
    }

    #[test]
    fn overrides_apply_to_config() {
        let Command::Export(args) = parse(&[
            "export",
            "--roster",
            "roster.csv",
            "--header-row",
            "0",
            "--lenient-numeric-dates",
        ]) else {
            panic!("expected export command");
        };

        let mut config = AppConfig::load().expect("config loads");
        args.roster.apply(&mut config);
        assert_eq!(config.roster.path, PathBuf::from("roster.csv"));
        assert_eq!(config.roster.header_row, 0);
        assert_eq!(config.classification.numeric_date_threshold, None);
        assert!(args.out.is_none());
    }
}
