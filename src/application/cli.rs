use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use serde_json::Value;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::application::ui::help_text;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::WorkflowMode;
use crate::domain::services::Identity;
use crate::infrastructure::gateway::GatewayManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

async fn print_session_status() -> Result<()> {
    let gateway = GatewayManager::get()?;
    let (user_id, session_id) = Identity::from_config().resolve("", "");

    match gateway.status(&user_id, &session_id).await {
        Ok(payload) => {
            if payload.get("success").and_then(|success| {
                return success.as_bool();
            }) == Some(false)
            {
                eprintln!("{}", Paint::red("No session data found"));
            } else {
                println!("{}", serde_json::to_string_pretty::<Value>(&payload)?);
            }
        }
        Err(err) => {
            eprintln!("{}", Paint::red(format!("Failed to get session status: {err}")));
        }
    }

    return Ok(());
}

async fn cleanup_session() -> Result<()> {
    let gateway = GatewayManager::get()?;
    let (user_id, session_id) = Identity::from_config().resolve("", "");

    match gateway.cleanup(&user_id, &session_id).await {
        Ok(result) => {
            println!(
                "{}",
                Paint::green(format!("Cleaned up {} files", result.deleted_files.len()))
            );
        }
        Err(err) => {
            eprintln!("{}", Paint::red(format!("Failed to cleanup session: {err}")));
        }
    }

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn arg_base_api_url() -> Arg {
    return Arg::new(ConfigKey::BaseApiUrl.to_string())
        .long(ConfigKey::BaseApiUrl.to_string())
        .env("BASE_API_URL")
        .num_args(1)
        .help(format!(
            "Base URL of the BOQ workflow backend. [default: {}]",
            Config::default(ConfigKey::BaseApiUrl)
        ))
        .global(true);
}

fn arg_mode() -> Arg {
    return Arg::new(ConfigKey::Mode.to_string())
        .short('m')
        .long(ConfigKey::Mode.to_string())
        .env("BOQTERM_MODE")
        .num_args(1)
        .help(format!(
            "The initial workflow mode. [default: {}]",
            Config::default(ConfigKey::Mode)
        ))
        .value_parser(PossibleValuesParser::new(WorkflowMode::VARIANTS))
        .global(true);
}

fn arg_request_timeout() -> Arg {
    return Arg::new(ConfigKey::RequestTimeout.to_string())
        .long(ConfigKey::RequestTimeout.to_string())
        .env("BOQTERM_REQUEST_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in seconds before timing out a workflow request. BOQ generation can be slow. [default: {}]",
            Config::default(ConfigKey::RequestTimeout)
        ))
        .global(true);
}

fn arg_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::HealthCheckTimeout.to_string())
        .long(ConfigKey::HealthCheckTimeout.to_string())
        .env("BOQTERM_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds before timing out when checking backend connectivity. [default: {}]",
            Config::default(ConfigKey::HealthCheckTimeout)
        ))
        .global(true);
}

fn arg_user_id() -> Arg {
    return Arg::new(ConfigKey::UserId.to_string())
        .long(ConfigKey::UserId.to_string())
        .env("BOQTERM_USER_ID")
        .num_args(1)
        .help("User ID. A random identifier is generated when not set.")
        .global(true);
}

fn arg_session_id() -> Arg {
    return Arg::new(ConfigKey::SessionId.to_string())
        .long(ConfigKey::SessionId.to_string())
        .env("BOQTERM_SESSION_ID")
        .num_args(1)
        .help("Session ID. A random identifier is generated when not set.")
        .global(true);
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a chat session with the BOQ workflow backend.");
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("WORKFLOW MODES:") {
                return Paint::new(format!("CHAT {line}")).underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("boqterm")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("status").about("Show server-side status for the configured session."))
        .subcommand(Command::new("cleanup").about("Delete server-side files for the configured session."))
        .arg(arg_base_api_url())
        .arg(arg_mode())
        .arg(arg_request_timeout())
        .arg(arg_health_check_timeout())
        .arg(arg_user_id())
        .arg(arg_session_id())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("BOQTERM_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .short('u')
                .long(ConfigKey::Username.to_string())
                .env("BOQTERM_USERNAME")
                .num_args(1)
                .help("Your user name displayed in all chat bubbles.")
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("status", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            print_session_status().await?;
            return Ok(false);
        }
        Some(("cleanup", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            cleanup_session().await?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
