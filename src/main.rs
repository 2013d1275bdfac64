//! Term Projection CLI
//!
//! Projects a single model point and writes its result tables

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use term_projection::output::{self, PointReport};
use term_projection::{ModelRunner, ProjectionConfig, DEFAULT_DATA_PATH};

#[derive(Parser)]
#[command(name = "term_projection")]
#[command(about = "Project cashflows and present values for one term life model point")]
#[command(version)]
struct Cli {
    /// Model point to project
    #[arg(short, long, default_value_t = 1)]
    point_id: u32,

    /// Directory holding model_point_table.csv, mort_table.csv and disc_rate_ann.csv
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// JSON projection config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for result files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write the decrement table
    #[arg(long)]
    detailed: bool,

    /// Number of months to print
    #[arg(long, default_value_t = 24)]
    show: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ProjectionConfig::from_json_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ProjectionConfig::default(),
    };
    config.detailed_output |= cli.detailed;

    let mut runner = ModelRunner::from_csv_path(&cli.data_dir, config)
        .with_context(|| format!("Failed to load data from {}", cli.data_dir.display()))?;
    runner.select(cli.point_id)?;

    let point = runner.model_point()?.clone();
    println!("Model point: {}", point.point_id);
    println!("  Age at entry: {}", point.age_at_entry);
    println!("  Sex: {}", point.sex);
    println!("  Policy term: {}", point.policy_term);
    println!("  Sum assured: {:.2}", point.sum_assured);
    println!();

    let result = runner.project_selected()?;

    println!("Cashflows ({} months):", result.proj_len());
    println!(
        "{:>5} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "t", "Premiums", "Claims", "Expenses", "Commissions", "Net Cashflow"
    );
    println!("{}", "-".repeat(80));
    for row in result.result_cf().iter().take(cli.show) {
        println!(
            "{:>5} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.t, row.premiums, row.claims, row.expenses, row.commissions, row.net_cf
        );
    }
    if result.proj_len() > cli.show {
        println!("... ({} more months)", result.proj_len() - cli.show);
    }

    let result_pv = result.result_pv();
    println!("\nPresent values:");
    println!("  Net premium pp: {:.4}", result.net_premium_pp);
    println!("  Premium pp: {:.2}", result.premium_pp);
    for row in &result_pv {
        println!("  {:<14} {:>14.2} {:>9.2}%", row.item, row.pv, row.pct_premium * 100.0);
    }

    let summary = result.summary();
    println!("  PV check: {}", if summary.pv_check { "OK" } else { "FAILED" });

    std::fs::create_dir_all(&cli.output_dir)?;
    let id = point.point_id;

    let cf_path = cli.output_dir.join(format!("result_cf_{}.csv", id));
    output::write_result_cf(output::create_file(&cf_path)?, result.result_cf())?;

    let pv_path = cli.output_dir.join(format!("result_pv_{}.csv", id));
    output::write_result_pv(output::create_file(&pv_path)?, &result_pv)?;

    if !result.decrements.is_empty() {
        let dec_path = cli.output_dir.join(format!("decrements_{}.csv", id));
        output::write_decrements(output::create_file(&dec_path)?, &result.decrements)?;
    }

    let report = PointReport {
        generated_at: chrono::Utc::now(),
        summary: &summary,
        result_pv: &result_pv,
    };
    let json_path = cli.output_dir.join(format!("summary_{}.json", id));
    output::write_json(output::create_file(&json_path)?, &report)?;

    println!("\nResults written to: {}", cli.output_dir.display());
    Ok(())
}
