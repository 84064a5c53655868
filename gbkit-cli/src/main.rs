mod adapt;
mod output;
mod parse;

use anyhow::Result;
use clap::{Command, arg};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "gbkit";
    pub const BIN_NAME: &str = "gbkit";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Parse GenBank flat files and extract a normalized component, gene and cross reference model.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Log debug messages (RUST_LOG takes precedence)").global(true))
        .subcommand(parse::cli::create_parse_cli())
        .subcommand(adapt::cli::create_adapt_cli())
}

fn init_logging(verbose: bool) {
    let level = match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));
    log::debug!("{} {}", consts::PKG_NAME, consts::VERSION);

    match matches.subcommand() {
        //
        // PARSE
        //
        Some((parse::cli::PARSE_CMD, matches)) => {
            parse::handlers::run_parse(matches)?;
        }

        //
        // ADAPT
        //
        Some((adapt::cli::ADAPT_CMD, matches)) => {
            adapt::handlers::run_adapt(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
