//! blazecheck: regression runs against the DemoBlaze store
//!
//! ## Usage
//!
//! ```bash
//! blazecheck list                                   # Every scenario
//! blazecheck run --suite cart                       # One suite
//! blazecheck run --tag smoke -j 4                   # Smoke cases, four lanes
//! blazecheck run --browser simulated --report r.xml --format junit
//! blazecheck config --json                          # Resolved settings
//! ```

use blazecheck::suite;
use blazecheck_cli::{
    Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs, ListArgs, RunArgs,
    ScenarioRunner, Verbosity,
};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);

    match cli.command {
        Commands::Run(args) => run_scenarios(config, &args),
        Commands::List(args) => run_list(&args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_scenarios(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let harness_config = args.harness.resolve()?;
    let cases = args.filter.to_filter().apply(suite::all());
    let config = config
        .with_jobs(args.jobs)
        .with_fail_fast(args.fail_fast)
        .with_report(args.report.clone(), args.format.into());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("failed to start async runtime: {e}")))?;
    let mut runner = ScenarioRunner::new(config);
    let outcome = rt.block_on(runner.run(harness_config, &cases))?;
    outcome.into_result().map(drop)
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let cases = args.filter.to_filter().apply(suite::all());
    if args.json {
        let rows: Vec<_> = cases
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "name": c.name,
                    "suite": c.suite,
                    "tags": c.tags,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let width = cases.iter().map(|c| c.id.len()).max().unwrap_or(0);
    for case in &cases {
        let tags = if case.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", case.tags.join(", "))
        };
        println!("{:<width$}  {}{tags}", case.id, case.name);
    }
    println!("\n{} scenarios", cases.len());
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let config = args.harness.resolve()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("browser           = {}", config.browser);
    println!("window_size       = {}", config.window_size);
    println!("headless          = {}", config.headless);
    println!("capture_artifacts = {}", config.capture_artifacts);
    println!("artifacts_dir     = {}", config.artifacts_dir.display());
    println!("base_url          = {}", config.base_url);
    println!("element_ms        = {}", config.timeouts.element_ms);
    println!("alert_ms          = {}", config.timeouts.alert_ms);
    println!("navigation_ms     = {}", config.timeouts.navigation_ms);
    println!("settle_ms         = {}", config.timeouts.settle_ms);
    if !config.browser_args.is_empty() {
        println!("browser_args      = {}", config.browser_args.join(" "));
    }
    if let Some(path) = &config.chrome_executable {
        println!("chrome_executable = {}", path.display());
    }
    Ok(())
}
