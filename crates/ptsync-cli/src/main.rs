//! Driver for applying a quarterly progress report to a project
//!
//! All fatal precondition failures exit with code 1 before the tracking
//! document is touched; a whole-file backup is taken before the first
//! write. Reconciliation itself never aborts the process.

use anyhow::{bail, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ptsync_books::BookRegistry;
use ptsync_engine::{DocumentStore, Reconciler};
use ptsync_report::{
    load_rows, report_from_rows, ProjectReport, Quarter, ReportingContext,
};
use std::path::PathBuf;

/// JSON mirror of the project's tracking document.
const TRACKING_FILENAME: &str = "ProjectProgress.json";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Command::new("ptsync")
        .version("0.1.0")
        .about("Apply a quarterly progress report to a project's tracking document")
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .required(true)
                .help("User name recorded on every status entry this run updates"),
        )
        .arg(
            Arg::new("status")
                .short('s')
                .long("status")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help(
                    "Completion report derived from the planning spreadsheet. \
                     The filename must be [project]-[quarter]-[year].json \
                     (e.g. MEP-Q2-2020.json)",
                ),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the project directory holding the tracking document"),
        )
        .arg(
            Arg::new("quarter")
                .short('q')
                .long("quarter")
                .help("Only apply facts reported for this calendar quarter (Q1..Q4)"),
        )
        .arg(
            Arg::new("sheet")
                .long("sheet")
                .action(ArgAction::SetTrue)
                .help(
                    "Treat the status file as extracted planning-sheet rows and \
                     derive (and save) the completion report from them",
                ),
        );

    if let Err(err) = run(&cli.get_matches()) {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let user = matches.get_one::<String>("user").unwrap();
    let status = matches.get_one::<PathBuf>("status").unwrap();
    let project = matches.get_one::<PathBuf>("project").unwrap();
    let quarter = matches
        .get_one::<String>("quarter")
        .map(|q| q.parse::<Quarter>())
        .transpose()?;
    let sheet = matches.get_flag("sheet");

    if !status.exists() {
        bail!("can't open status file {}", status.display());
    }
    let tracking = project.join(TRACKING_FILENAME);
    if !tracking.exists() {
        bail!("can't find tracking document {}", tracking.display());
    }

    let context = ReportingContext::from_report_path(status)?;
    tracing::info!(
        "user \"{user}\" processing {} for project {}",
        status.display(),
        context.project_name
    );

    let registry = BookRegistry::new();
    let mut report = if sheet {
        let rows = load_rows(status)?;
        let report = report_from_rows(&rows, &context, &registry);
        report.save(context.report_filename())?;
        tracing::info!("project status written to {}", context.report_filename());
        report
    } else {
        ProjectReport::load(status)?
    };

    if let Some(quarter) = quarter {
        report.retain_quarter(quarter);
    }

    let store = DocumentStore::new();
    let backup = store.backup(&tracking)?;
    tracing::info!("backup written to {}", backup.display());

    let mut document = store.load(&tracking)?;
    let summary = Reconciler::new(&registry).reconcile(&report, &mut document, user);
    store.save(&tracking, &document)?;

    tracing::info!(
        "project {} updates written to {}: {} status added, {} updated, \
         {} already done, {} assignments added, {} facts skipped",
        context.project_name,
        tracking.display(),
        summary.records_added,
        summary.records_updated,
        summary.records_unchanged,
        summary.assignments_added,
        summary.facts_skipped
    );
    Ok(())
}
