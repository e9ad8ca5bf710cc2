use std::process::ExitCode;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use gasmap::harness::{Error, Harness};
use gasmap::harness::report::Report;

#[derive(Debug, Parser)]
#[command(version, about = "Compares the gas cost of memory-backed and storage-backed mappings")]
struct Cli {
    /// Entries the extended scenario writes and reads back
    #[arg(long, env = "GASMAP_BOUND", default_value_t = 60, value_parser = parse_positive)]
    bound: u64,

    /// Times the extended2 scenario reads the same entry back
    #[arg(long, env = "GASMAP_READS", default_value_t = 150, value_parser = parse_positive)]
    reads: u64,

    /// Shifts every key of the extended scenarios by this amount
    #[arg(long, env = "GASMAP_OFFSET")]
    offset: Option<u64>,

    /// Gas limit for every transaction
    #[arg(long, env = "GASMAP_GAS_LIMIT", default_value_t = 30_000_000, value_parser = parse_gas_limit)]
    gas_limit: usize,

    /// Print the report as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn parse_positive(s: &str) -> Result<u64, String> {
    let value: u64 = s.parse().map_err(|e| format!("{e}"))?;
    if value == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(value)
}

fn parse_gas_limit(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|e| format!("{e}"))?;
    if !(21_000..=30_000_000).contains(&value) {
        return Err("must be between 21000 and the block limit of 30000000".to_string());
    }
    Ok(value)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy())
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: &Cli) -> Result<Report, Error> {
    let mut report = Report::default();
    let (mut harness, receipt) = Harness::deploy(cli.gas_limit)?;
    report.deploy_gas = receipt.gas_used;
    report.sanity_gas = harness.sanity_check()?.gas_used;
    report.record("single", None, None, harness.compare_single()?);
    report.record("extended", Some(cli.bound), cli.offset, harness.compare_extended(cli.bound, cli.offset)?);
    report.record("extended2", Some(cli.reads), cli.offset, harness.compare_many_reads(cli.reads, cli.offset)?);
    Ok(report)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let report = match run(&cli) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            },
        }
    } else {
        for comparison in &report.comparisons {
            let verdict = if comparison.memory_wins { "mem wins" } else { "storage wins" };
            println!("{}: mem {} gas, storage {} gas ({verdict})",
                comparison.scenario, comparison.memory_gas, comparison.storage_gas);
        }
    }

    if report.all_hold() {
        ExitCode::SUCCESS
    } else {
        error!("storage beat memory in at least one scenario");
        ExitCode::FAILURE
    }
}
