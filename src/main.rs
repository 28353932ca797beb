// Main CLI entry point for apirecon
// Uses clap for argument parsing

use anyhow::{bail, Context, Result};
use apirecon::config::{GenerateConfig, ScanConfig, DEFAULT_OUTPUT_DIR};
use apirecon::generator::generate;
use apirecon::loader::read_document;
use apirecon::reporting::export_csv;
use apirecon::scanner::{collect_sources, emit_results, run_scan};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use env_logger::Env;
use log::{debug, info};

fn cli() -> Command {
    Command::new("apirecon")
        .version(clap::crate_version!())
        .author("Jake Abendroth")
        .about("Find unauthenticated endpoints in OpenAPI/Swagger documents and generate example requests")
        .subcommand_required(true)
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Enable debug logging"))
        .after_help("EXAMPLES:\n  apirecon scan --url https://example.com/swagger/v1/swagger.json\n  apirecon scan -f urls.txt --silent -o hits.txt\n  apirecon scan --spec specs/ --csv-report\n  apirecon requests --spec openapi.json --host example.com --auth-value TOKEN --proxy 127.0.0.1:8080")
        .subcommand(Command::new("scan")
            .about("Detect public (unauthenticated) endpoints")
            .arg(Arg::new("url")
                .short('u')
                .long("url")
                .num_args(1)
                .conflicts_with("file")
                .help("Single Swagger/OpenAPI URL to check"))
            .arg(Arg::new("file")
                .short('f')
                .long("file")
                .num_args(1)
                .help("File containing URLs to check (one per line)"))
            .arg(Arg::new("spec")
                .short('s')
                .long("spec")
                .num_args(1..)
                .help("Local Swagger/OpenAPI file(s) or directories"))
            .arg(Arg::new("output")
                .short('o')
                .long("output")
                .num_args(1)
                .help("Output file to write results"))
            .arg(Arg::new("silent")
                .long("silent")
                .action(ArgAction::SetTrue)
                .help("Only output sources with public endpoints"))
            .arg(Arg::new("csv_report")
                .long("csv-report")
                .action(ArgAction::SetTrue)
                .help("Also write a timestamped CSV of public endpoints"))
            .arg(Arg::new("delay_ms")
                .long("delay-ms")
                .num_args(1)
                .value_parser(value_parser!(u64))
                .default_value("500")
                .help("Pause between network sources, in milliseconds")))
        .subcommand(Command::new("requests")
            .about("Generate example HTTP requests for every operation")
            .arg(Arg::new("spec")
                .short('s')
                .long("spec")
                .required(true)
                .num_args(1)
                .help("Path to the Swagger/OpenAPI document"))
            .arg(Arg::new("host")
                .short('H')
                .long("host")
                .num_args(1)
                .help("Host header (defaults to the host declared by the document)"))
            .arg(Arg::new("auth_value")
                .short('t')
                .long("auth-value")
                .visible_alias("token")
                .num_args(1)
                .help("Bearer token, API key, or user:pass for Basic auth"))
            .arg(Arg::new("auth_type")
                .long("auth-type")
                .num_args(1)
                .value_parser(["bearer", "apiKey", "basic"])
                .default_value("bearer")
                .help("Authentication type"))
            .arg(Arg::new("api_key_header")
                .long("api-key-header")
                .num_args(1)
                .default_value("X-API-Key")
                .help("Header carrying the API key for --auth-type apiKey"))
            .arg(Arg::new("proxy")
                .short('p')
                .long("proxy")
                .num_args(1)
                .help("Proxy to replay requests through (e.g. 127.0.0.1:8080)"))
            .arg(Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .num_args(1)
                .default_value(DEFAULT_OUTPUT_DIR)
                .help("Directory to save request files (recreated on every run)"))
            .arg(Arg::new("max_depth")
                .long("max-depth")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("5")
                .help("Maximum schema nesting followed when synthesizing values")))
}

async fn run_scan_command(matches: &ArgMatches) -> Result<()> {
    let config = ScanConfig::from_matches(matches);
    if config.urls.is_empty() && config.url_list.is_none() && config.specs.is_empty() {
        bail!("one of --url, --file or --spec must be specified");
    }

    let sources = collect_sources(&config).context("failed to read URL list")?;
    if sources.is_empty() {
        bail!("no sources to process");
    }
    debug!("scanning {} source(s)", sources.len());

    let reports = run_scan(&config, &sources).await?;
    emit_results(&config, &reports).context("failed to write results")?;
    if config.csv_report {
        let filename = export_csv(&reports).context("failed to write CSV report")?;
        info!("CSV report written to {}", filename);
    }
    Ok(())
}

async fn run_requests_command(matches: &ArgMatches) -> Result<()> {
    let config = GenerateConfig::from_matches(matches)?;
    let spec = config.spec.display().to_string();
    let doc = read_document(&spec).with_context(|| format!("cannot load {}", spec))?;

    let summary = generate(&doc, &config)
        .await
        .with_context(|| format!("failed to generate requests into {}", config.output_dir.display()))?;
    info!(
        "generated {} request(s) in {}",
        summary.written.len(),
        config.output_dir.display()
    );
    if config.proxy.is_some() {
        info!(
            "replayed {} request(s), {} failed",
            summary.replayed, summary.replay_failures
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let env = Env::default().filter_or(
        "RUST_LOG",
        if matches.get_flag("verbose") { "debug" } else { "info" },
    );
    env_logger::init_from_env(env);

    match matches.subcommand() {
        Some(("scan", sub)) => run_scan_command(sub).await,
        Some(("requests", sub)) => run_requests_command(sub).await,
        _ => unreachable!("subcommand_required is set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn url_and_file_conflict() {
        let res = cli().try_get_matches_from(["apirecon", "scan", "--url", "a", "--file", "b"]);
        assert!(res.is_err());
    }
}
