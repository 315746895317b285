use clap::Parser;

mod args;
mod cli;

use args::Cli;

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    if let Err(e) = cli::run(cli) {
        cli::print_error(&e);
        std::process::exit(1);
    }
}
