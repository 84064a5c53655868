use clap::{Arg, Command, arg};

pub const ADAPT_CMD: &str = "adapt";

pub fn create_adapt_cli() -> Command {
    Command::new(ADAPT_CMD)
        .author("Databio")
        .about("Extract components, genes and cross references from GenBank records.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .required(true)
                .help("GenBank file, or JSON lines from `parse` (.jsonl), optionally gzip'd"),
        )
        .arg(arg!(-c --config <config> "Adapter config (.toml)"))
        .arg(arg!(-o --output <output> "Write adapted records to this file instead of stdout"))
        .arg(arg!(--pretty "Pretty print each adapted record"))
        .arg(arg!(--"skip-invalid" "Log and skip records that fail instead of stopping"))
}
