use clap::Parser;

use ashwam_cli::cli::Cli;
use ashwam_cli::commands;
use ashwam_core::tracing_setup::{init_tracing, init_tracing_with_filter, LogFormat};

fn main() {
    let cli = Cli::parse();

    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Pretty };
    if cli.verbose {
        init_tracing_with_filter("ashwam=debug,ashwam_cli=debug", format);
    } else {
        init_tracing(format);
    }

    if let Err(e) = commands::execute(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
