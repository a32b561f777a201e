use clap::{ColorChoice, Parser};
use colored::Colorize;
use ksd::{Args, logger::Logger};
use std::{
    io::{IsTerminal, stderr},
    process,
};

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Auto => colored::control::set_override(stderr().is_terminal()),
        ColorChoice::Never => colored::control::set_override(false),
    }

    Logger::init(args.verbose)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(args.command.execute())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".bold().red(), e);
        process::exit(1);
    }
}
