//! austat - report user activity statistics from JSONL event files

use austat::{
    cli::{Cli, Command, parse_date, parse_date_opt},
    data_loader::DataLoader,
    memory::MemorySeenCache,
    output::{ReportTable, get_formatter},
    recorder::{RecordOutcome, Recorder},
    reports::Reporter,
    AustatError, Result, UsageRecord,
};
use chrono::Utc;
use clap::Parser;
use std::io::Write;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Trim to the most recent rows and order for display.
fn select_rows(mut records: Vec<UsageRecord>, recent: Option<usize>, ascending: bool) -> Vec<UsageRecord> {
    if let Some(recent) = recent {
        let skip = records.len().saturating_sub(recent);
        records.drain(..skip);
    }
    if !ascending {
        records.reverse();
    }
    records
}

/// Print one report in the requested syntax.
fn emit<F>(cli: &Cli, records: Vec<UsageRecord>, table_of: F) -> Result<()>
where
    F: Fn(&[UsageRecord], &str) -> ReportTable,
{
    let records = select_rows(records, cli.recent, cli.ascending);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        let formatter = get_formatter(cli.csv);
        print!("{}", formatter.format_report(&table_of(&records, &cli.datefmt)));
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments first to check for quiet flag
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("austat=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let loader = DataLoader::new(cli.events.clone(), cli.accounts.clone());
    let (events, directory) = loader.load()?;
    let reporter = Reporter::new(&events, &directory);

    match &cli.command {
        Command::Daily(args) => {
            info!("Running daily usage report");
            let records: Vec<UsageRecord> = reporter
                .daily_usage(
                    parse_date(&args.subscription_start)?,
                    parse_date_opt(args.after.as_deref())?,
                    parse_date_opt(args.before.as_deref())?,
                )
                .collect::<Result<_>>()?;
            emit(&cli, records, ReportTable::daily)?;
        }

        Command::Monthly(args) => {
            info!("Running monthly usage report");
            let records: Vec<UsageRecord> = reporter
                .customer_monthly_usage(
                    parse_date(&args.subscription_start)?,
                    parse_date_opt(args.after.as_deref())?,
                    parse_date_opt(args.before.as_deref())?,
                )
                .collect::<Result<_>>()?;
            emit(&cli, records, ReportTable::monthly)?;
        }

        Command::Quarterly(args) => {
            info!("Running quarterly usage report");
            let records: Vec<UsageRecord> = reporter
                .customer_quarterly_usage(
                    parse_date(&args.subscription_start)?,
                    parse_date_opt(args.after.as_deref())?,
                    parse_date_opt(args.before.as_deref())?,
                )
                .collect::<Result<_>>()?;
            emit(&cli, records, ReportTable::quarterly)?;
        }

        Command::Yearly(args) => {
            info!("Running yearly usage report");
            let records: Vec<UsageRecord> = reporter
                .customer_yearly_usage(
                    parse_date(&args.subscription_start)?,
                    parse_date_opt(args.after.as_deref())?,
                    parse_date_opt(args.before.as_deref())?,
                )
                .collect::<Result<_>>()?;
            emit(&cli, records, ReportTable::yearly)?;
        }

        Command::Calendar(args) => {
            args.validate()?;
            info!("Running calendar monthly usage report");
            let records: Vec<UsageRecord> = reporter
                .calendar_monthly_usage(
                    parse_date_opt(args.after.as_deref())?,
                    parse_date_opt(args.before.as_deref())?,
                )
                .collect::<Result<_>>()?;
            emit(&cli, records, ReportTable::calendar)?;
        }

        Command::Active(args) => {
            info!("Counting active users");
            let count = reporter.count_active_users(
                parse_date_opt(args.after.as_deref())?,
                parse_date_opt(args.before.as_deref())?,
            )?;
            println!("{count}");
        }

        Command::Record(args) => {
            let events_path = cli.events.clone().ok_or_else(|| {
                AustatError::InvalidArgument("record requires --events".to_string())
            })?;
            let when = parse_date_opt(args.when.as_deref())?
                .unwrap_or_else(|| Utc::now().fixed_offset());

            // One-shot invocation: the rate-limit window cannot span
            // processes, so only the duplicate check applies here.
            let cache = MemorySeenCache::new();
            let recorder = Recorder::new(&events, &cache);
            let outcome =
                recorder.record_seen(args.user.into(), Some(when), false, !args.allow_duplicate)?;

            if outcome == RecordOutcome::Added {
                let mut file = std::fs::OpenOptions::new()
                    .append(true)
                    .open(&events_path)?;
                writeln!(
                    file,
                    "{}",
                    serde_json::json!({ "user": args.user, "when": when.to_rfc3339() })
                )?;
            }
            println!("{outcome}");
        }
    }

    Ok(())
}
