//! Export the cohort retention matrix as CSV
//!
//! One row per monthly cohort, one column per month since effective date.
//!
//! Usage: cohort_export <policies.csv> [output.csv] [as_of]

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use commission_analytics::records::load_policies;
use commission_analytics::CohortAnalyzer;
use commission_analytics::assumptions::CohortAssumptions;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let policies_path = args.get(1).map(String::as_str).unwrap_or("policies.csv");
    let output_path = args.get(2).map(String::as_str).unwrap_or("cohort_retention.csv");
    let as_of = match args.get(3) {
        Some(value) => value
            .parse::<NaiveDate>()
            .with_context(|| format!("invalid as-of date: {}", value))?,
        None => Local::now().date_naive(),
    };

    let start = Instant::now();
    let policies = load_policies(policies_path)
        .with_context(|| format!("loading policies from {}", policies_path))?;
    println!("Loaded {} policies in {:?}", policies.len(), start.elapsed());

    let assumptions = CohortAssumptions::default();
    let window = assumptions.window_months as usize;
    let cohorts = CohortAnalyzer::new(assumptions).retention(&policies, as_of);

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {}", output_path))?;

    let mut header = vec!["cohort_month".to_string(), "cohort_label".to_string(), "total_policies".to_string()];
    header.extend((0..=window).map(|m| format!("m{}", m)));
    writer.write_record(&header)?;

    for cohort in &cohorts {
        let mut row = vec![
            cohort.cohort_month.clone(),
            cohort.cohort_label.clone(),
            cohort.total_policies.to_string(),
        ];
        // Months the cohort has not reached yet stay blank
        row.extend((0..=window).map(|m| {
            cohort
                .retention_by_month
                .get(m)
                .map(|r| format!("{:.2}", r))
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }
    writer.flush()?;

    println!("Wrote {} cohorts to {} in {:?}", cohorts.len(), output_path, start.elapsed());
    Ok(())
}
