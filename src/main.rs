use clap::Parser;
use env_logger::Env;
use log::{debug, warn};
use snafu::ErrorCompat;

mod args;
mod lnt;

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    debug!("main: args: {:?}", args);

    let res = lnt::run_dashboard(&args);
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
