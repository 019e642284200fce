use anyhow::Context;
use clap::Parser;
use mkl_config::GeneratorConfig;

mod cli;
mod pipeline;

fn main() {
    if let Err(error) = run() {
        eprintln!("gen-mkl-rs error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = GeneratorConfig::load_with_dotenv(&cli.overrides())
        .context("failed to load configuration")?;
    let registry = pipeline::load_registry(&cli.pattern_input())?;

    let output = pipeline::generate(&config, &registry)?;
    pipeline::write_output(&cli.output, &output)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GEN_MKL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
