//! Commission Analytics CLI
//!
//! Loads CSV exports and prints analytics reports as JSON

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use commission_analytics::records::{load_carriers, load_commissions, load_expenses, load_policies};
use commission_analytics::{AgencySnapshot, AnalyticsRunner, Assumptions, DashboardRequest, TimePeriod};

#[derive(Parser)]
#[command(name = "commission_analytics")]
#[command(author, version, about = "Cohort, risk, forecast and attribution reports for commission books", long_about = None)]
struct Cli {
    /// Policies CSV export
    #[arg(short, long, global = true, default_value = "policies.csv")]
    policies: PathBuf,

    /// Commissions CSV export
    #[arg(short, long, global = true)]
    commissions: Option<PathBuf>,

    /// Expenses CSV export
    #[arg(short, long, global = true)]
    expenses: Option<PathBuf>,

    /// Carriers CSV export (id,name)
    #[arg(long, global = true)]
    carriers: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// JSON file overriding the standard assumptions
    #[arg(short, long, global = true)]
    assumptions: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Retention, chargeback and earning curves per monthly cohort
    Cohorts,

    /// Chargeback risk score for every policy with a commission
    Risk {
        /// Only list high and critical policies
        #[arg(long)]
        elevated: bool,
    },

    /// Renewals, growth projection, seasonality and risk outlook
    Forecast,

    /// Current period against the previous one
    Attribution {
        /// daily, weekly, monthly, MTD or yearly
        #[arg(long, default_value = "monthly")]
        period: TimePeriod,
    },

    /// Period totals, current state, derived and pace metrics
    Metrics {
        /// daily, weekly, monthly, MTD or yearly
        #[arg(long, default_value = "monthly")]
        period: TimePeriod,

        /// 0 = current period, -1 = previous, ...
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
    },

    /// Period metrics with cohort and forecast headlines
    Dashboard {
        /// daily, weekly, monthly, MTD or yearly
        #[arg(long, default_value = "monthly")]
        period: TimePeriod,
    },

    /// Print the standard assumptions as JSON
    Defaults,
}

struct Book {
    policies: Vec<commission_analytics::Policy>,
    commissions: Vec<commission_analytics::Commission>,
    expenses: Vec<commission_analytics::Expense>,
    carriers: Vec<commission_analytics::Carrier>,
}

impl Book {
    fn load(cli: &Cli) -> Result<Self> {
        let policies = load_policies(&cli.policies)
            .with_context(|| format!("loading policies from {}", cli.policies.display()))?;

        let commissions = match &cli.commissions {
            Some(path) => load_commissions(path)
                .with_context(|| format!("loading commissions from {}", path.display()))?,
            None => Vec::new(),
        };
        let expenses = match &cli.expenses {
            Some(path) => load_expenses(path)
                .with_context(|| format!("loading expenses from {}", path.display()))?,
            None => Vec::new(),
        };
        let carriers = match &cli.carriers {
            Some(path) => load_carriers(path)
                .with_context(|| format!("loading carriers from {}", path.display()))?,
            None => Vec::new(),
        };

        info!(
            "Loaded {} policies, {} commissions, {} expenses, {} carriers",
            policies.len(),
            commissions.len(),
            expenses.len(),
            carriers.len()
        );

        Ok(Self {
            policies,
            commissions,
            expenses,
            carriers,
        })
    }

    fn snapshot(&self) -> AgencySnapshot<'_> {
        AgencySnapshot::new(&self.policies, &self.commissions)
            .with_expenses(&self.expenses)
            .with_carriers(&self.carriers)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Commands::Defaults = cli.command {
        return emit(&Assumptions::standard(), cli.output.as_deref());
    }

    let runner = match &cli.assumptions {
        Some(path) => AnalyticsRunner::from_json_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => AnalyticsRunner::new(),
    };
    let now = reference_instant(cli.as_of);
    let book = Book::load(&cli)?;
    let snapshot = book.snapshot();
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Cohorts => emit(&runner.cohort_report(snapshot, now), output),
        Commands::Risk { elevated } => {
            let mut scores = runner.risk_scores(snapshot, now);
            if elevated {
                scores.retain(|s| s.risk_level.is_elevated());
            }
            emit(&scores, output)
        }
        Commands::Forecast => emit(&runner.forecast_report(snapshot, now), output),
        Commands::Attribution { period } => emit(&runner.attribution_report(snapshot, period, now), output),
        Commands::Metrics { period, offset } => {
            let request = DashboardRequest {
                time_period: period,
                now,
                offset,
            };
            emit(&runner.metrics(snapshot, request), output)
        }
        Commands::Dashboard { period } => {
            let request = DashboardRequest {
                time_period: period,
                now,
                offset: 0,
            };
            emit(&runner.dashboard(snapshot, request), output)
        }
        Commands::Defaults => Ok(()),
    }
}

/// Noon on the given date, or the current local time
fn reference_instant(as_of: Option<NaiveDate>) -> NaiveDateTime {
    match as_of {
        Some(date) => date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()),
        None => Local::now().naive_local(),
    }
}

fn emit<T: Serialize>(report: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing report")?;
    match output {
        Some(path) => {
            let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            writeln!(file, "{}", json)?;
            println!("Report written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
        }
    }
    Ok(())
}
