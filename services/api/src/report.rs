use crate::cli::{CompanyArgs, ExportArgs, LookupArgs, ReportArgs, RosterArgs};
use crate::infra::{build_service, progress_meter, RosterService};
use chrono::Local;
use std::fmt::Write as _;
use training_tracker::config::AppConfig;
use training_tracker::error::AppError;
use training_tracker::telemetry;
use training_tracker::workflows::training::report::views::{
    CompanyView, DashboardView, GroupTableView, ListingRow, PersonDetailView, PersonLookup,
    TopicSummaryView,
};
use training_tracker::workflows::training::RosterUpload;
use tracing::info;

const METER_WIDTH: usize = 20;

fn prepare(args: &RosterArgs) -> Result<RosterService, AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    telemetry::init(&config.telemetry)?;
    Ok(build_service(&config))
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let service = prepare(&args.roster)?;
    let filter = args.roster.filter();
    let upload = RosterUpload::default();

    let dashboard = service.dashboard(&filter, &upload)?;
    print!("{}", render_dashboard(&dashboard));

    if args.list {
        let rows = service.listing(&filter, &upload)?;
        println!("\nPeople ({})", rows.len());
        print!("{}", render_listing(&rows));
    }
    Ok(())
}

pub(crate) fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let service = prepare(&args.roster)?;
    let lookup = match (args.target.id, args.target.name) {
        (Some(id), _) => PersonLookup::by_id(id),
        (None, Some(name)) => PersonLookup::by_name(name),
        (None, None) => return Err(AppError::NotFound("lookup target".to_string())),
    };

    let detail = service.person(&args.roster.filter(), &lookup, &RosterUpload::default())?;
    print!("{}", render_person(&detail));
    Ok(())
}

pub(crate) fn run_company(args: CompanyArgs) -> Result<(), AppError> {
    let service = prepare(&args.roster)?;
    let view = service.company(&args.roster.filter(), &args.name, &RosterUpload::default())?;
    print!("{}", render_company(&view));
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let service = prepare(&args.roster)?;
    let csv = service.export_csv(&args.roster.filter(), &RosterUpload::default())?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, &csv)?;
            info!(
                path = %path.display(),
                rows = csv.lines().count().saturating_sub(1),
                "export written"
            );
        }
        None => print!("{csv}"),
    }
    Ok(())
}

pub(crate) fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Training progress dashboard ({})",
        Local::now().format("%d/%m/%Y %H:%M")
    );
    let _ = writeln!(out, "Records in scope: {}", view.total_records);
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{notice}");
    }

    for summary in &view.topics {
        out.push('\n');
        render_topic_summary(&mut out, summary);
    }
    for table in view.by_company.iter().chain(&view.by_staff_type) {
        out.push('\n');
        render_group_table(&mut out, table);
    }
    out
}

fn render_topic_summary(out: &mut String, summary: &TopicSummaryView) {
    let totals = &summary.totals;
    let _ = writeln!(out, "{} - {}", summary.topic_code, summary.topic_label);
    let _ = writeln!(
        out,
        "  Theory base: {} | Certifiable: {} | Pending: {} | Progress: {:.1}% {}",
        totals.theory_base,
        totals.certifiable,
        totals.pending,
        totals.progress_pct,
        progress_meter(summary.progress_bar, METER_WIDTH)
    );
}

fn render_group_table(out: &mut String, table: &GroupTableView) {
    let _ = writeln!(out, "{} by {}", table.topic_code, table.grouping_label);
    let _ = writeln!(
        out,
        "  {:<28} {:>6} {:>6} {:>6} {:>6} {:>7}",
        table.grouping_label, "People", "Theory", "Cert", "Pend", "%"
    );
    for row in &table.rows {
        let _ = writeln!(
            out,
            "  {:<28} {:>6} {:>6} {:>6} {:>6} {:>6.1}%",
            row.key, row.people, row.theory_base, row.certifiable, row.pending, row.progress_pct
        );
    }
}

pub(crate) fn render_listing(rows: &[ListingRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let topics: Vec<String> = row
            .topics
            .iter()
            .map(|entry| format!("{} {} {}", entry.topic_code, entry.badge_symbol, entry.date))
            .collect();
        let _ = writeln!(
            out,
            "  {} ({}) | {} | {} | {} | {}",
            row.full_name,
            row.person_id,
            row.company,
            topics.join(" | "),
            row.overall_label,
            row.next_action_label
        );
    }
    out
}

pub(crate) fn render_person(view: &PersonDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", view.full_name, view.person_id);
    let _ = writeln!(out, "  Role: {} / {}", view.role, view.specialty);
    let _ = writeln!(out, "  Staff type: {}", view.staff_type);
    let _ = writeln!(out, "  Company: {}", view.company);
    for topic in &view.topics {
        let _ = writeln!(out, "  {} - {}", topic.topic_code, topic.topic_label);
        let _ = writeln!(out, "    Theory:   {}", topic.theory);
        let _ = writeln!(out, "    Practice: {}", topic.practice);
        let _ = writeln!(out, "    Status:   {}", topic.status_label);
    }
    let _ = writeln!(out, "  Overall: {}", view.overall_label);
    let _ = writeln!(out, "  Next action: {}", view.next_action_label);
    out
}

pub(crate) fn render_company(view: &CompanyView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} people)", view.company, view.people);
    for summary in &view.topics {
        render_topic_summary(&mut out, summary);
    }
    out.push_str(&render_listing(&view.listing));
    out
}
