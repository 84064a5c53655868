use clap::{Arg, Command, arg};

pub const PARSE_CMD: &str = "parse";

pub fn create_parse_cli() -> Command {
    Command::new(PARSE_CMD)
        .author("Databio")
        .about("Parse a GenBank flat file into JSON records, one record per line.")
        .arg_required_else_help(true)
        .arg(Arg::new("input").required(true).help("GenBank file, optionally gzip'd"))
        .arg(arg!(-o --output <output> "Write records to this file instead of stdout"))
        .arg(arg!(--pretty "Pretty print each record"))
        .arg(arg!(--"skip-invalid" "Log and skip records that fail to parse instead of stopping"))
}
