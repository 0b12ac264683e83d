use anyhow::Result;
use clap::{App as Cli, Arg};
use intake_wizard::app::{load_answers, Answers, App};
use intake_wizard::config::Config;
use intake_wizard::error::AppError;
use intake_wizard::logger::CustomLogger;
use intake_wizard::wizards::WizardKind;
use log::*;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("wizard")
                .short("w")
                .long("wizard")
                .value_name("WIZARD")
                .help("Wizard to run")
                .possible_values(&["onboarding", "recruit"])
                .default_value("onboarding")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("record")
                .short("r")
                .long("record")
                .value_name("ID")
                .help("Edit an existing record instead of creating one")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("answers")
                .short("a")
                .long("answers")
                .value_name("FILE")
                .help("YAML file of answers keyed by section name")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log per-operation detail"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = CustomLogger::new(level);
    logger.set_log_callback(Box::new(|line| eprintln!("{}", line)));
    log::set_max_level(logger.level());
    log::set_boxed_logger(Box::new(logger)).map_err(|e| AppError::Logger(e.to_string()))?;

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;

    let kind: WizardKind = matches.value_of("wizard").unwrap_or("onboarding").parse()?;
    let answers = match matches.value_of("answers") {
        Some(path) => load_answers(Path::new(path))?,
        None => Answers::new(),
    };

    match App::start(config, kind, matches.value_of("record"), answers).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
