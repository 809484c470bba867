use clap::Parser;
use tracing_subscriber::EnvFilter;

use core_genome::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = EnvFilter::new(cli::log_directives(cli.verbose));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Homologs(args) => {
            cli::homologs::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Core(args) => {
            cli::genome::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Run(args) => {
            cli::run::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
