#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the bicycle accident dashboard.

use std::path::PathBuf;

use clap::Parser;
use velo_dash::selection::resolve_labels;
use velo_dash::{Dashboard, DashboardConfig, Dimension, Selection, interactive, report};
use velo_dash_accident_models::Attribute;
use velo_dash_pipeline::load_dataset;

#[derive(Parser)]
#[command(
    name = "velo_dash",
    about = "Bicycle accident dashboard for France, 2005-2021"
)]
struct Cli {
    /// Accident CSV to load (overrides the config file and `VELO_DASH_DATA`)
    #[arg(long)]
    data: Option<PathBuf>,
    /// TOML config replacing the built-in settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Severity label to keep on the map (repeatable, e.g. "Tué")
    #[arg(long = "severity")]
    severities: Vec<String>,
    /// Sex label to keep on the map (repeatable, e.g. "Féminin")
    #[arg(long = "sex")]
    sexes: Vec<String>,
    /// Condition examined by the severity breakdown
    #[arg(long, value_enum)]
    dimension: Option<Dimension>,
    /// Category of the dimension to break down (e.g. "Pluie forte")
    #[arg(long)]
    category: Option<String>,
    /// Print the dashboard as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Also write the map layer to this `GeoJSON` file
    #[arg(long)]
    geojson: Option<PathBuf>,
    /// Edit the selection with interactive prompts
    #[arg(long)]
    interactive: bool,
}

impl Cli {
    const fn has_selection_flags(&self) -> bool {
        !self.severities.is_empty()
            || !self.sexes.is_empty()
            || self.dimension.is_some()
            || self.category.is_some()
    }

    const fn has_output_flags(&self) -> bool {
        self.json || self.geojson.is_some()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data) = &cli.data {
        config.data_path.clone_from(data);
    }

    let records = load_dataset(&config.data_path)?;

    let mut selection = Selection::defaults(&records);
    if !cli.severities.is_empty() {
        selection.severities = resolve_labels(Attribute::Severity, &cli.severities)?;
    }
    if !cli.sexes.is_empty() {
        selection.sexes = resolve_labels(Attribute::Sex, &cli.sexes)?;
    }
    if let Some(dimension) = cli.dimension {
        selection.switch_dimension(dimension, &records);
    }
    if let Some(category) = &cli.category {
        selection.set_category(category)?;
    }

    let prompt = cli.interactive
        || (!cli.has_selection_flags() && !cli.has_output_flags() && console::user_attended());
    if prompt {
        interactive::run(&records, &config, selection)?;
        return Ok(());
    }

    let dashboard = Dashboard::build(&records, &selection, &config);

    if let Some(path) = &cli.geojson {
        report::write_geojson(&dashboard, path)?;
    }

    if cli.json {
        println!("{}", report::render_json(&dashboard)?);
    } else {
        print!("{}", report::render_text(&dashboard));
    }

    Ok(())
}
