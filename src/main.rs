use anyhow::Result;
use clap::Parser;
use dendra_lib::app::{check, App};
use dendra_lib::model::config::AppConfig;
use dendra_lib::model::metrics::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run in
    #[arg(short, long, value_enum, default_value = "simulate")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of steps
    #[arg(long)]
    steps: Option<u64>,

    /// Output directory (defaults to `export.directory`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON snapshot of the arbor
    #[arg(long)]
    snapshot: bool,

    /// SWC file or directory to validate in check mode
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Simulate,
    Check,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(steps) = args.steps {
        config.world.steps = steps;
    }
    if args.snapshot {
        config.export.snapshot = true;
    }
    config.validate()?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.export.directory));

    match args.mode {
        Mode::Simulate => {
            let steps = config.world.steps;
            let mut app = App::new(config)?;
            app.run(steps);
            let manifest = app.export(&output)?;
            println!(
                "Wrote {} morphologies to {}",
                manifest.files.len(),
                output.display()
            );
        }
        Mode::Check => {
            let input = args.input.unwrap_or(output);
            let checked = check(&input)?;
            println!("{checked} SWC file(s) valid");
        }
    }
    Ok(())
}
