//! Terminal front end for the BIRT/NPT phase-out projection engine.

mod explain;
mod format;
mod table;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use birt_core::{PolicySchedule, ScenarioInput, ScenarioProjector, ScenarioWindow};
use birt_data::ScheduleLoader;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Project BIRT/NPT liability and filing-year cash burden across the
/// gross-receipts exemption phase-out.
#[derive(Parser, Debug)]
#[command(name = "birt")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// CSV overriding the built-in rate table
    /// (year,birt_net_income,birt_gross_receipts,npt)
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// CSV overriding the built-in exemption table (year,exemption)
    #[arg(long, global = true)]
    exemptions: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-year liability and cash-flow tables plus the shock analysis
    Scenario(ProfileArgs),
    /// Just the shock-year numbers
    Summary(ProfileArgs),
    /// Step-by-step walkthrough of the arithmetic
    Explain(ProfileArgs),
}

#[derive(clap::Args, Debug)]
struct ProfileArgs {
    /// Expected annual net income
    #[arg(short, long)]
    net_income: Decimal,

    /// Expected annual gross receipts
    #[arg(short, long)]
    gross_receipts: Decimal,

    /// Year the business began operating
    #[arg(short, long)]
    start_year: i32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    /// Only available for `explain`
    Html,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Html => "html",
        };
        f.write_str(name)
    }
}

impl ProfileArgs {
    fn input(&self) -> ScenarioInput {
        ScenarioInput {
            net_income: self.net_income,
            gross_receipts: self.gross_receipts,
            start_year: self.start_year,
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let policy = load_policy(&args)?;

    match &args.command {
        Command::Scenario(profile) => run_scenario(&policy, profile),
        Command::Summary(profile) => run_summary(&policy, profile),
        Command::Explain(profile) => run_explain(&policy, profile),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_policy(args: &Args) -> Result<PolicySchedule> {
    match (&args.rates, &args.exemptions) {
        (None, None) => Ok(birt_data::philadelphia::schedule()),
        (Some(rates_path), Some(exemptions_path)) => {
            let rates_file = File::open(rates_path)
                .with_context(|| format!("failed to open: {}", rates_path.display()))?;
            let rates = ScheduleLoader::parse_rates(rates_file)
                .with_context(|| format!("failed to parse: {}", rates_path.display()))?;

            let exemptions_file = File::open(exemptions_path)
                .with_context(|| format!("failed to open: {}", exemptions_path.display()))?;
            let exemptions = ScheduleLoader::parse_exemptions(exemptions_file)
                .with_context(|| format!("failed to parse: {}", exemptions_path.display()))?;

            let schedule = ScheduleLoader::build(
                &rates,
                &exemptions,
                birt_data::philadelphia::BIRT_CREDIT_RATE,
                birt_data::philadelphia::NPT_ESTIMATED_RATE,
            )
            .context("schedule failed validation")?;
            tracing::info!(
                first_year = schedule.first_year()?,
                last_year = schedule.last_year()?,
                "using custom policy schedule"
            );
            Ok(schedule)
        }
        _ => bail!("--rates and --exemptions must be supplied together"),
    }
}

fn run_scenario(
    policy: &PolicySchedule,
    profile: &ProfileArgs,
) -> Result<()> {
    let projector = ScenarioProjector::new(policy);
    let result = projector.project(&profile.input())?;

    match profile.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            println!("Tax liability by income year");
            println!("{}", table::liability_table(result.liabilities.values()));
            println!();
            println!("Cash remitted by filing year");
            println!("{}", table::cash_flow_table(result.cash_flows.values()));
            println!();
            println!(
                "Annual tax increase:  {}",
                format::currency(result.annual_tax_increase)
            );
            println!(
                "Shock year {}:      {} ({} shock; cash {}, working capital {})",
                result.shock_year,
                format::currency(result.shock_amount),
                result.shock_type,
                format::currency(result.cash_shock),
                format::currency(result.working_cash_shock),
            );
        }
        OutputFormat::Html => bail!("html output is only available for `explain`"),
    }
    Ok(())
}

fn run_summary(
    policy: &PolicySchedule,
    profile: &ProfileArgs,
) -> Result<()> {
    let projector = ScenarioProjector::new(policy);
    let summary = projector.shock_summary(&profile.input())?;

    match profile.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("Shock year:            {}", summary.shock_year);
            println!(
                "Shock amount:          {} ({} shock)",
                format::currency(summary.shock_amount),
                summary.shock_type
            );
            println!(
                "  Cash shock:          {}",
                format::currency(summary.cash_shock)
            );
            println!(
                "  Working capital:     {}",
                format::currency(summary.working_cash_shock)
            );
        }
        OutputFormat::Html => bail!("html output is only available for `explain`"),
    }
    Ok(())
}

fn run_explain(
    policy: &PolicySchedule,
    profile: &ProfileArgs,
) -> Result<()> {
    let projector = ScenarioProjector::new(policy);
    // The walkthrough covers the schedule's full span so even the
    // earliest filing can be shown.
    let window = ScenarioWindow::extended(policy)?;
    let result = projector.project_in(&profile.input(), &window)?;
    let sections = explain::walkthrough(policy, &result)?;

    match profile.format {
        OutputFormat::Text => print!("{}", explain::render_text(&sections)),
        OutputFormat::Html => print!("{}", explain::render_html(&sections)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sections)?),
    }
    Ok(())
}
