use anyhow::Result;
use clap::Parser;
use evalcompare::cli::{Cli, Commands, CompareArgs, OutputFormat, SummaryArgs};
use evalcompare::json_output::{JsonComparisonOutput, JsonSummaryOutput};
use evalcompare::regression::compare_runs;
use evalcompare::scores::RunScores;
use evalcompare::stats::MetricSummary;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
///
/// Without `--debug` only an explicit `RUST_LOG` enables output.
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_compare(args: &CompareArgs) -> Result<ExitCode> {
    let config = args.comparison_config()?;
    let baseline = RunScores::from_file(&args.baseline)?;
    let candidate = RunScores::from_file(&args.candidate)?;

    let report = compare_runs(&baseline, &candidate, &config)?;
    let passed = report.passed;

    match args.format {
        OutputFormat::Text => print!("{}", report.to_report_string()),
        OutputFormat::Json => println!("{}", JsonComparisonOutput::new(report).to_json()?),
    }

    if args.fail_on_regression && !passed {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_summary(args: &SummaryArgs) -> Result<ExitCode> {
    let run = RunScores::from_file(&args.scores)?;
    let summaries = run.summarize(args.confidence_level)?;

    match args.format {
        OutputFormat::Text => print_summary_table(&run, &summaries, args.confidence_level),
        OutputFormat::Json => {
            let mut output = JsonSummaryOutput::new(run.run_ref(), args.confidence_level);
            for summary in summaries {
                output.add_metric(summary);
            }
            println!("{}", output.to_json()?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary_table(run: &RunScores, summaries: &[MetricSummary], confidence_level: f64) {
    println!("Run: {}", run.run_ref());
    println!(
        "{:<24} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}  {:.0}% CI",
        "metric",
        "count",
        "mean",
        "std_dev",
        "median",
        "min",
        "max",
        confidence_level * 100.0
    );
    println!("{}", "─".repeat(100));
    for s in summaries {
        println!(
            "{:<24} {:>6} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}  [{:.4}, {:.4}]",
            s.name,
            s.count,
            s.mean,
            s.std_dev,
            s.median,
            s.min,
            s.max,
            s.confidence_interval.lower,
            s.confidence_interval.upper
        );
    }
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    match &args.command {
        Commands::Compare(compare) => run_compare(compare),
        Commands::Summary(summary) => run_summary(summary),
    }
}
