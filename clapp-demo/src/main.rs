mod level;

use std::num::ParseFloatError;
use std::path::PathBuf;

use clapp::FromArgs;
use tracing_subscriber::EnvFilter;

use crate::level::Level;

/// Copy SOURCE to DEST, pretending to do something interesting along the way.
#[derive(FromArgs, Debug)]
#[clapp(
    prog = "clapp-demo",
    usage = "clapp-demo [-v] [-r RATE] [-j JOBS] [-l LABEL] [-m MODE] [-e LEVEL] SOURCE DEST",
    epilog = "Set RUST_LOG=clapp=trace to watch the grammar being built and matched.",
    type_parser(ty = f64, with = parse_fraction),
    init = Arguments::normalize
)]
struct Arguments {
    source: PathBuf,
    dest: PathBuf,

    verbose_: bool,

    /// Accepts `0.25` or `25%`
    #[clapp(default = 1.0)]
    rate_: f64,

    #[clapp(default = 4, options = ["1", "2", "4", "8"])]
    jobs_: u8,

    label_: Option<String>,

    #[clapp(default = "fast".to_owned(), options = ["fast", "slow"])]
    mode_: String,

    #[clapp(default = Level::Low)]
    level_: Level,
}

impl Arguments {
    fn normalize(&mut self) {
        self.rate_ = self.rate_.clamp(0.0, 1.0);
    }
}

fn parse_fraction(arg: &str) -> Result<f64, ParseFloatError> {
    match arg.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().map(|percent| percent / 100.0),
        None => arg.parse(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::from_env()?;

    tracing::info!(?args, "bound arguments");

    if args.verbose_ {
        println!("{args:#?}");
    }

    let label = args.label_.as_deref().unwrap_or("untitled");

    println!(
        "{label}: {source} -> {dest} at {rate:.0}% with {jobs} {mode} jobs ({level:?})",
        source = args.source.display(),
        dest = args.dest.display(),
        rate = args.rate_ * 100.0,
        jobs = args.jobs_,
        mode = args.mode_,
        level = args.level_,
    );

    Ok(())
}
