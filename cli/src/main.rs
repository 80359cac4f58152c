use anyhow::Context;
use clap::Parser;
use fieldcore::charges::Charge;
use session::config::{parse_charge, SessionConfig};
use session::runner::Runner;
use std::path::PathBuf;

mod session;

#[derive(Parser)]
#[command(author, version, about = "Headless electrostatics field renderer")]
struct Args {
    /// Load field settings and an initial charge layout from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the sampling grid resolution
    #[arg(long)]
    resolution: Option<usize>,
    /// Place a charge, given as Q,X,Y (repeatable)
    #[arg(long = "charge", value_parser = parse_charge, allow_hyphen_values = true)]
    charges: Vec<Charge>,
    /// Key presses to replay in order (1, 2, 3 toggle layers, c clears, s saves)
    #[arg(long, default_value = "")]
    keys: String,
    /// SVG file written by the save key, or with the final frame
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print a JSON summary of the session
    #[arg(long, default_value_t = false)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let session = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    }
    .with_overrides(args.resolution, &args.charges);

    let mut runner = Runner::new(session)?;
    let report = runner.execute(&args.keys, args.output.as_deref())?;

    if args.summary {
        let json = serde_json::to_string_pretty(&report).context("serializing session summary")?;
        println!("{json}");
    } else {
        println!(
            "Rendered {} charges -> field lines {}, equipotential paths {}, heat-map {}",
            report.charges,
            report.scene.field_lines,
            report.scene.equipotential_paths,
            if report.scene.heatmap { "on" } else { "off" }
        );
        if let Some(path) = &report.exported {
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}
