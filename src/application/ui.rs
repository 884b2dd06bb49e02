use anyhow::Result;
use tokio::fs;
use tokio::io;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Attachment;
use crate::domain::models::Author;
use crate::domain::models::ChatCommand;
use crate::domain::models::GatewayBox;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::PlanDocument;
use crate::domain::models::WorkflowMode;
use crate::domain::services::render_plan;
use crate::domain::services::Identity;
use crate::domain::services::SessionController;
use crate::domain::services::PDF_FILE_NAME;
use crate::domain::services::PDF_MIME_TYPE;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /mode (/m) [MODE?] - Show or set the workflow mode.
- /attach (/a) [FILE_PATH] - Stage an architectural file (pdf, jpg, jpeg, png, bmp, gif, webp) for the next send.
- /clear-files (/cf) - Discard staged files.
- /upload (/u) - Send staged files for analysis without typing a message.
- /new (/n) - Start a new session and clear the transcript.
- /status (/st) - Show server-side session status.
- /cleanup (/cl) - Delete server-side session files and clear the transcript.
- /export (/e) [FILE_PATH?] - Export the latest plan in the transcript as a PDF. Defaults to plan_analysis.pdf.
- /user [USER_ID] - Set the user id for subsequent requests.
- /session [SESSION_ID] - Set the session id for subsequent requests.
- /help (/h) - Provides this help menu.
- /quit /exit (/q) - Exit boqterm.

WORKFLOW MODES:
- auto - Smart routing based on your input.
- analyze - File analysis only.
- boq - BOQ generation workflow.
- chat - Text-only conversation. Staged files are not sent.
        "#;

    return text.trim().to_string();
}

fn short_id(id: &str) -> String {
    return id.chars().take(8).collect::<String>();
}

fn print_message(message: &Message) {
    if message.message_type() == MessageType::Error {
        println!("{}", Paint::red(&message.text));
        return;
    }

    println!("{}", Paint::new(format!("{}:", message.author.to_string())).bold());

    if message.author == Author::Assistant {
        if let Some(plan) = PlanDocument::try_parse(&message.text) {
            println!("{}", render_plan(&plan));
            return;
        }
    }

    println!("{}", message.text);
}

async fn submit(controller: &mut SessionController, text: &str, record_user: bool) {
    println!("Processing your request...");

    let (message, sent_count) = controller.submit(text, record_user).await;
    print_message(&message);

    if sent_count > 0 {
        println!("{}", Paint::green(format!("{sent_count} file(s) sent")));
    }
}

fn handle_mode(controller: &mut SessionController, args: &[String]) {
    let arg = match args.first() {
        Some(arg) => arg,
        None => {
            println!(
                "Current mode: {} - {}",
                controller.mode,
                controller.mode.description()
            );
            return;
        }
    };

    match WorkflowMode::parse(arg) {
        Ok(mode) => {
            controller.mode = mode;
            Config::set(ConfigKey::Mode, &mode.to_string());
            println!("Current mode: {} - {}", mode, mode.description());
        }
        Err(err) => {
            println!("{}", Paint::red(err.to_string()));
        }
    }
}

async fn handle_attach(controller: &mut SessionController, args: &[String]) {
    let file_path = match args.first() {
        Some(file_path) => file_path,
        None => {
            println!("{}", Paint::red("Usage: /attach FILE_PATH"));
            return;
        }
    };

    if !controller.mode.allows_attachments() {
        println!("{}", Paint::red("Chat mode: file upload disabled"));
        return;
    }

    match Attachment::from_path(file_path).await {
        Ok(attachment) => {
            let filename = attachment.filename.to_string();
            let staged_count = controller.stage(attachment);
            println!("Staged {filename} ({staged_count} file(s) staged)");
        }
        Err(err) => {
            println!("{}", Paint::red(err.to_string()));
        }
    }
}

async fn handle_status(controller: &mut SessionController) {
    match controller.status().await {
        Ok(payload) => {
            if payload.get("success").and_then(|success| {
                return success.as_bool();
            }) == Some(false)
            {
                println!("{}", Paint::red("No session data found"));
                return;
            }

            match serde_json::to_string_pretty(&payload) {
                Ok(pretty) => println!("{pretty}"),
                Err(_) => println!("{payload}"),
            }
        }
        Err(err) => {
            println!("{}", Paint::red(format!("Failed to get session status: {err}")));
        }
    }
}

async fn handle_cleanup(controller: &mut SessionController) {
    match controller.cleanup().await {
        Ok(deleted_count) => {
            println!("{}", Paint::green(format!("Cleaned up {deleted_count} files")));
        }
        Err(err) => {
            println!("{}", Paint::red(format!("Failed to cleanup session: {err}")));
        }
    }
}

async fn handle_export(controller: &SessionController, args: &[String]) {
    let res = match controller.export_plan() {
        Some(res) => res,
        None => {
            println!("No plan found in the transcript to export.");
            return;
        }
    };

    let bytes = match res {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("{}", Paint::red(format!("Failed to export plan: {err}")));
            return;
        }
    };

    let file_path = args.first().map(|e| {
        return e.to_string();
    });
    let file_path = file_path.unwrap_or_else(|| {
        return PDF_FILE_NAME.to_string();
    });

    match fs::write(&file_path, bytes).await {
        Ok(_) => {
            println!("{}", Paint::green(format!("Saved plan to {file_path} ({PDF_MIME_TYPE})")));
        }
        Err(err) => {
            println!("{}", Paint::red(format!("Failed to write {file_path}: {err}")));
        }
    }
}

pub async fn start(gateway: GatewayBox) -> Result<()> {
    let mode = WorkflowMode::parse(&Config::get(ConfigKey::Mode))?;
    let mut controller = SessionController::new(gateway, mode);
    controller.identity = Identity::from_config();

    let (user_id, session_id) = controller.identity.resolve("", "");

    println!("{}", Paint::new(format!("boqterm v{}", env!("CARGO_PKG_VERSION"))).bold());
    println!("Current mode: {} - {}", mode, mode.description());
    println!(
        "User: {} ({})  Session: {}",
        Config::get(ConfigKey::Username),
        short_id(&user_id),
        short_id(&session_id)
    );

    if controller.health_check().await {
        println!("{}", Paint::green("Backend API connected"));
    } else {
        println!("{}", Paint::red("Backend API offline"));
        println!(
            "Make sure the backend server is running on {}",
            Config::get(ConfigKey::BaseApiUrl)
        );
    }
    println!("Type /help for commands.");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let cmd = match ChatCommand::parse(text) {
            Some(cmd) => cmd,
            None => {
                submit(&mut controller, text, true).await;
                continue;
            }
        };

        if cmd.is_quit() {
            break;
        } else if cmd.is_help() {
            println!("{}", help_text());
        } else if cmd.is_mode() {
            handle_mode(&mut controller, &cmd.args);
        } else if cmd.is_attach() {
            handle_attach(&mut controller, &cmd.args).await;
        } else if cmd.is_clear_files() {
            controller.clear_staged();
            println!("Staged files discarded.");
        } else if cmd.is_upload() {
            println!("Uploading files and processing...");
            match controller.upload().await {
                Some((message, sent_count)) => {
                    print_message(&message);
                    if message.message_type() == MessageType::Normal {
                        println!(
                            "{}",
                            Paint::green(format!("{sent_count} file(s) processed successfully"))
                        );
                    }
                }
                None => {
                    println!("Select files with /attach first.");
                }
            }
        } else if cmd.is_new_session() {
            let new_session = controller.new_session();
            println!("Started new session {}", short_id(&new_session));
        } else if cmd.is_status() {
            handle_status(&mut controller).await;
        } else if cmd.is_cleanup() {
            handle_cleanup(&mut controller).await;
        } else if cmd.is_export() {
            handle_export(&controller, &cmd.args).await;
        } else if cmd.is_user_set() {
            match cmd.args.first() {
                Some(id) => {
                    controller.identity.set_user(id);
                    println!("User set to {}", short_id(id));
                }
                None => println!("{}", Paint::red("Usage: /user USER_ID")),
            }
        } else if cmd.is_session_set() {
            match cmd.args.first() {
                Some(id) => {
                    controller.identity.set_session(id);
                    println!("Session set to {}", short_id(id));
                }
                None => println!("{}", Paint::red("Usage: /session SESSION_ID")),
            }
        }
    }

    return Ok(());
}
