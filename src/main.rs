use clap::Parser;
use readsim::cli::{Args, Commands};
use readsim::commands;

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match args.command {
        Commands::Simulate {
            lengths_file,
            qualities_file,
            database,
            database_dir,
            seed,
            error_free,
            output,
        } => commands::simulate::run(
            lengths_file,
            qualities_file,
            database,
            database_dir,
            seed,
            error_free,
            output,
        ),
        Commands::Profile {
            reads_file,
            lengths_out,
            qualities_out,
            max_positions,
        } => commands::profile::run(reads_file, lengths_out, qualities_out, max_positions),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
