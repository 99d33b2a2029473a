use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minex_validation::cli::{random_seed, Mode, Options};
use minex_validation::{create_engine, Harness, MinexError};

fn main() -> ExitCode {
    let options = Options::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(options: &Options) -> Result<(), MinexError> {
    let seed = match options.seed {
        Some(seed) => seed,
        None => {
            let seed = random_seed();
            info!("no seed given, using {}", seed);
            seed
        }
    };

    let samples = options.sample_table()?;
    let pairs = options.pair_table()?;
    let mut harness = Harness::new(create_engine(), options.config(), samples, pairs);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.mode {
        Mode::Create => harness.test_creation(&mut out, seed).map(|_| ()),
        Mode::Match => harness.test_matching(&mut out, seed).map(|_| ()),
        Mode::Pid => harness.test_library_id(&mut out).map(|_| ()),
        Mode::Pairs => harness.generate_pairs(&mut out, seed).map(|_| ()),
    }
}
