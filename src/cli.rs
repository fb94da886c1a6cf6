// src/cli.rs
use anyhow::Result;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::{ConfigOverrides, FailurePolicy, InputMode, DEFAULT_CONFIG_FILE};
use crate::infra::t;

pub mod commands {
    pub mod init;
    pub mod run;
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

fn build_cli() -> Command {
    Command::new("solver-bench")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about").to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config").to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("work-dir")
                        .long("work-dir")
                        .help(t!("cli.arg_work_dir").to_string())
                        .value_name("WORK_DIR")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("cases-dir")
                        .long("cases-dir")
                        .help(t!("cli.arg_cases_dir").to_string())
                        .value_name("DIR")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("extension")
                        .long("extension")
                        .help(t!("cli.arg_extension").to_string())
                        .value_name("EXT")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("driver")
                        .long("driver")
                        .help(t!("cli.arg_driver").to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("driver-script")
                        .long("driver-script")
                        .help(t!("cli.arg_driver_script").to_string())
                        .value_name("PATH")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("input-mode")
                        .long("input-mode")
                        .help(t!("cli.arg_input_mode").to_string())
                        .value_name("MODE")
                        .value_parser(clap::value_parser!(InputMode))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("log")
                        .long("log")
                        .help(t!("cli.arg_log").to_string())
                        .value_name("CSV")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("on-failure")
                        .long("on-failure")
                        .help(t!("cli.arg_on_failure").to_string())
                        .value_name("POLICY")
                        .value_parser(clap::value_parser!(FailurePolicy))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .help(t!("cli.arg_filter").to_string())
                        .value_name("PATTERN")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("total-runners")
                        .long("total-runners")
                        .help(t!("cli.arg_total_runners").to_string())
                        .value_name("TOTAL_RUNNERS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("runner-index"),
                )
                .arg(
                    Arg::new("runner-index")
                        .long("runner-index")
                        .help(t!("cli.arg_runner_index").to_string())
                        .value_name("RUNNER_INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("total-runners"),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("cli.arg_html").to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("cli.arg_json").to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help(t!("cli.arg_quiet").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about").to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_output").to_string())
                        .value_name("PATH")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("cli.arg_force").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn run_args_from(matches: &ArgMatches, lang: Option<String>) -> commands::run::RunArgs {
    let overrides = ConfigOverrides {
        cases_dir: matches.get_one::<PathBuf>("cases-dir").cloned(),
        extension: matches.get_one::<String>("extension").cloned(),
        log_path: matches.get_one::<PathBuf>("log").cloned(),
        input_mode: matches.get_one::<InputMode>("input-mode").copied(),
        on_failure: matches.get_one::<FailurePolicy>("on-failure").copied(),
        driver_command: matches.get_one::<String>("driver").cloned(),
        driver_script: matches.get_one::<PathBuf>("driver-script").cloned(),
    };

    commands::run::RunArgs {
        // Both have defaults.
        config: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        config_explicit: matches.value_source("config") == Some(ValueSource::CommandLine),
        work_dir: matches
            .get_one::<PathBuf>("work-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        overrides,
        filter: matches.get_one::<String>("filter").cloned(),
        total_runners: matches.get_one::<usize>("total-runners").copied(),
        runner_index: matches.get_one::<usize>("runner-index").copied(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
        echo: !matches.get_flag("quiet"),
        lang,
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let explicit_lang = pre_parse_language();
    let language = crate::init_locale(explicit_lang.as_deref());

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            commands::run::execute(run_args_from(run_matches, explicit_lang)).await?;
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let force = init_matches.get_flag("force");
            let non_interactive = init_matches.get_flag("non-interactive");

            if explicit_lang.is_none() && !non_interactive {
                println!("{}", t!("init.language_detected", lang = &language));
            }
            commands::init::execute(&output, force, non_interactive, &language)?;
        }
        _ => {
            // subcommand_required: clap has already printed help and exited.
        }
    }
    Ok(())
}
