use clap::Parser;
use std::process;

use taskpilot::cli;
use taskpilot::cli::commands::{Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Do { text } => cli::run::run(&text.join(" "), json_output),
        Commands::Status => cli::status::run(json_output),
    };

    process::exit(exit_code);
}
