use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use vinostat::cli::{Args, Command, OutputFormat};
use vinostat::config::{Config, DEFAULT_CONFIG_FILE};
use vinostat::data::loader::load_file;
use vinostat::data::model::{Dataset, QUALITY_FIELD};
use vinostat::data::synthetic;
use vinostat::report::{self, SummaryTable};
use vinostat::session::Session;
use vinostat::stats;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.init_config {
        return init_config();
    }

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(&args);
    log::debug!("Effective config: {config:?}");

    let dataset = load_dataset(&config)?;
    let mut session = Session::new(config.filter);
    session.set_dataset(dataset)?;

    let output = run(&session, &config, args.command.unwrap_or(Command::Report), args.format)?;
    println!("{output}");
    Ok(())
}

/// Write a default `vinostat.toml` in the working directory.
fn init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        bail!("{DEFAULT_CONFIG_FILE} already exists; remove it first or edit it manually");
    }
    std::fs::write(path, Config::default_toml()?)
        .with_context(|| format!("Failed to write {DEFAULT_CONFIG_FILE}"))?;
    println!("Created {DEFAULT_CONFIG_FILE} with default settings.");
    Ok(())
}

fn load_dataset(config: &Config) -> Result<Dataset> {
    match &config.data.path {
        Some(path) => load_file(path, config.data.load_options())
            .with_context(|| format!("loading {}", path.display())),
        None => {
            log::info!(
                "No data file configured, generating {} synthetic records (seed {})",
                config.data.synthetic_count,
                config.data.seed
            );
            Ok(synthetic::generate(
                config.data.synthetic_count,
                config.data.seed,
            )?)
        }
    }
}

fn run(session: &Session, config: &Config, command: Command, format: OutputFormat) -> Result<String> {
    let view = session.visible_records();
    let analysis = &config.analysis;

    // Empty field lists on the command line fall back to the configured ones.
    let or_default = |given: &[String], default: &[String]| -> Vec<String> {
        if given.is_empty() {
            default.to_vec()
        } else {
            given.to_vec()
        }
    };

    match command {
        Command::Report => report::render_snapshot(&session.snapshot(analysis)?, format),
        Command::Overview => report::render(&stats::overview(&view)?, format),
        Command::Summary { fields } => {
            let fields = or_default(&fields, &analysis.correlation_fields);
            let rows = fields
                .into_iter()
                .map(|f| stats::summarize(&view, &f).map(|s| (f, s)))
                .collect::<Result<Vec<_>, _>>()?;
            report::render(&SummaryTable { rows }, format)
        }
        Command::Correlation { fields } => {
            let fields = or_default(&fields, &analysis.correlation_fields);
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            report::render(&stats::correlation_matrix(&view, &fields)?, format)
        }
        Command::Grouped { by, fields } => {
            let fields = or_default(&fields, &analysis.heatmap_fields);
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let by = by.unwrap_or_else(|| analysis.group_field.clone());
            report::render(&stats::grouped_average(&view, &by, &fields)?, format)
        }
        Command::Histogram { field, bins } => {
            let field = field.unwrap_or_else(|| analysis.histogram_field.clone());
            let bins = bins.unwrap_or(analysis.histogram_bins);
            report::render(&stats::histogram(&view, &field, bins)?, format)
        }
        Command::Counts { field } => {
            let field = field.unwrap_or_else(|| QUALITY_FIELD.to_string());
            report::render(&stats::value_counts(&view, &field)?, format)
        }
        Command::Scatter { fields } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            report::render(&stats::project(&view, &fields)?, format)
        }
    }
}
