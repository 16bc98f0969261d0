use clap::Parser;
use probe_cli::{args, cli::Cli, commands, logging, output};

#[tokio::main]
async fn main() {
	let cli = Cli::parse_from(args::normalize_flags(std::env::args_os()));
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::run(cli).await {
		output::print_error_stderr(&err);
		std::process::exit(1);
	}
}
