use clap::Parser;
use env_logger::Env;

use lightship_cross::cli::Cli;
use lightship_cross::sh::{DryRun, Executor, System};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let mut exec: Box<dyn Executor> = if cli.dry_run {
        Box::new(DryRun::default())
    } else {
        Box::new(System)
    };

    match lightship_cross::run(&cli, exec.as_mut()) {
        Ok(layout) => {
            if !cli.dry_run {
                println!("[done] {}", layout.archive_path().display());
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
