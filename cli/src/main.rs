//! Draws coverage maps for BTS sectors: a wedge per cell, their union, and an optional labeled
//! grid. The result is written as GeoJSON for a map renderer, or as KML to open elsewhere.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod inspect_kml;
mod options;
mod render;

use anyhow::Result;
use structopt::StructOpt;

use coverage::CoverageConfig;

use crate::options::ConfigArgs;

#[derive(StructOpt)]
#[structopt(name = "btsmap", about = "Coverage maps for BTS sectors")]
enum Command {
    /// Builds the map and writes it as GeoJSON, and optionally KML too
    Render {
        #[structopt(flatten)]
        config: ConfigArgs,
        /// Where to write GeoJSON. Printed to STDOUT if omitted.
        #[structopt(long)]
        output: Option<String>,
        /// Also write a KML file here
        #[structopt(long)]
        kml: Option<String>,
    },
    /// Builds the map and writes it as KML
    ExportKml {
        #[structopt(flatten)]
        config: ConfigArgs,
        /// The KML file to write
        #[structopt(long)]
        output: String,
    },
    /// Lists every placemark in a KML file
    InspectKml {
        /// The path to a KML file
        #[structopt()]
        input: String,
    },
    /// Prints the spreadsheet-style name of each zero-based column index
    ColumnLabel {
        #[structopt()]
        indices: Vec<usize>,
    },
    /// Prints the default config as JSON, as a starting point for a config file
    DefaultConfig,
}

fn main() -> Result<()> {
    let cmd = Command::from_args();

    // These only print something meant to be piped elsewhere
    if !matches!(cmd, Command::ColumnLabel { .. } | Command::DefaultConfig) {
        abstutil::logger::setup();
    }

    match cmd {
        Command::Render {
            config,
            output,
            kml,
        } => render::run(config.load()?, output, kml)?,
        Command::ExportKml { config, output } => render::export_kml(config.load()?, output)?,
        Command::InspectKml { input } => inspect_kml::run(input)?,
        Command::ColumnLabel { indices } => {
            for idx in indices {
                println!("{}\t{}", idx, coverage::column_label(idx));
            }
        }
        Command::DefaultConfig => {
            println!(
                "{}",
                serde_json::to_string_pretty(&CoverageConfig::default())?
            );
        }
    }
    Ok(())
}
