use clap::Parser;
use log::{error, info};

mod args;
mod survey;

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if args.verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
    info!("args: {:?}", args);

    if let Err(e) = survey::run_survey(&args) {
        error!("{:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
