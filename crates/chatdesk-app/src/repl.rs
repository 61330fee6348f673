use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use std::path::{Path, PathBuf};

use chatdesk_client::{ChatApi, ChatController, ChatView, SendOutcome};
use chatdesk_types::FileUpload;

use crate::config::ClientConfig;
use crate::terminal::TerminalView;

const HELP: &str = "\
Commands:
  <text>            send a message (a new chat is created if none is open)
  /new              start a new chat
  /chats            list chats (* marks the open one)
  /open <n|id>      open a chat by list number or id
  /delete [n|id]    delete a chat (default: the open one)
  /rename <title>   rename the open chat
  /attach <path>    attach a document or image to the next message
  /detach           drop the pending attachment
  /help             show this help
  exit, quit        leave";

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    NewChat,
    ListChats,
    Open(String),
    Delete(Option<String>),
    Rename(String),
    Attach(PathBuf),
    Detach,
    Help,
    Exit,
    /// Known command with a missing argument
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// `None` for blank input
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if line == "exit" || line == "quit" {
            return Some(ReplCommand::Exit);
        }

        if !line.starts_with('/') {
            return Some(ReplCommand::Send(line.to_string()));
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let cmd = match (command, arg.is_empty()) {
            ("/new", _) => ReplCommand::NewChat,
            ("/chats", _) => ReplCommand::ListChats,
            ("/open", true) => ReplCommand::Usage("/open <n|id>"),
            ("/open", false) => ReplCommand::Open(arg.to_string()),
            ("/delete", true) => ReplCommand::Delete(None),
            ("/delete", false) => ReplCommand::Delete(Some(arg.to_string())),
            ("/rename", true) => ReplCommand::Usage("/rename <title>"),
            ("/rename", false) => ReplCommand::Rename(arg.to_string()),
            ("/attach", true) => ReplCommand::Usage("/attach <path>"),
            ("/attach", false) => ReplCommand::Attach(PathBuf::from(arg)),
            ("/detach", _) => ReplCommand::Detach,
            ("/help", _) | ("/?", _) => ReplCommand::Help,
            (other, _) => ReplCommand::Unknown(other.to_string()),
        };
        Some(cmd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Run interactive REPL mode
pub async fn run_repl<A, W>(
    controller: &ChatController<A, TerminalView<W>>,
    config: &ClientConfig,
) -> Result<()>
where
    A: ChatApi,
    W: Write,
{
    println!("{}", "💬 chatdesk".bright_cyan().bold());
    println!("{}", format!("Chat store: {}", config.server_url).bright_black());
    println!("{}", "Type /help for commands, 'exit' to quit\n".bright_black());

    let mut rl = DefaultEditor::new()?;
    if let Some(path) = &config.history_file {
        // No history yet on first run
        let _ = rl.load_history(path);
    }

    // Errors are logged by the controller; an unreachable store still lets the user type
    let _ = controller.load_chats().await;

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let Some(command) = ReplCommand::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());

                if handle_command(controller, command).await == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "(Ctrl-C) type 'exit' to quit".bright_black());
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &config.history_file {
        save_history(&mut rl, path);
    }

    println!("{}", "Goodbye!".bright_black());
    Ok(())
}

fn save_history(rl: &mut DefaultEditor, path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = rl.save_history(path) {
        log::warn!("Could not save history to {}: {}", path.display(), e);
    }
}

async fn handle_command<A, W>(
    controller: &ChatController<A, TerminalView<W>>,
    command: ReplCommand,
) -> Flow
where
    A: ChatApi,
    W: Write,
{
    let view = controller.view();

    match command {
        ReplCommand::Send(text) => match controller.send_message(&text).await {
            SendOutcome::Blocked => view.info("Still working on the previous request"),
            SendOutcome::Failed(e) => log::debug!("Send failed: {}", e),
            SendOutcome::Skipped | SendOutcome::Delivered(_) => {}
        },

        ReplCommand::NewChat => {
            if let Err(e) = controller.create_chat().await {
                view.alert(&format!("Could not create a chat: {}", e));
            }
        }

        ReplCommand::ListChats => {
            if let Err(e) = controller.load_chats().await {
                view.alert(&format!("Could not load chats: {}", e));
            }
            view.print_chat_list();
        }

        ReplCommand::Open(target) => match resolve_target(controller, &target) {
            Some(id) => {
                if let Err(e) = controller.load_chat(&id).await {
                    view.alert(&format!("Could not open chat {}: {}", id, e));
                }
            }
            None => view.alert(&format!("No chat matches '{}'. Try /chats", target)),
        },

        ReplCommand::Delete(target) => {
            let id = match &target {
                Some(target) => resolve_target(controller, target),
                None => controller.active_chat_id(),
            };
            match id {
                Some(id) => match controller.delete_chat(&id).await {
                    Ok(()) => view.info(&format!("Deleted chat {}", id)),
                    Err(e) => view.alert(&format!("Could not delete chat {}: {}", id, e)),
                },
                None => view.alert("No chat to delete"),
            }
        }

        ReplCommand::Rename(title) => match controller.active_chat_id() {
            Some(id) => {
                if let Err(e) = controller.rename_chat(&id, &title).await {
                    view.alert(&format!("Could not rename chat: {}", e));
                }
            }
            None => view.alert("Open a chat first"),
        },

        ReplCommand::Attach(path) => match read_upload(&path).await {
            // The controller reports processing failures through the view
            Ok(upload) => {
                let _ = controller.attach_file(upload).await;
            }
            Err(e) => view.alert(&format!("Could not read {}: {}", path.display(), e)),
        },

        ReplCommand::Detach => {
            let pending = controller.session().pending_attachment().is_some();
            if pending {
                controller.remove_attachment();
                view.info("Attachment removed");
            } else {
                view.info("No file attached");
            }
        }

        ReplCommand::Help => view.info(HELP),

        ReplCommand::Usage(usage) => view.info(&format!("Usage: {}", usage)),

        ReplCommand::Unknown(command) => {
            view.alert(&format!("Unknown command {}. Type /help", command))
        }

        ReplCommand::Exit => return Flow::Exit,
    }

    Flow::Continue
}

/// A list number from the last `/chats`, or a literal chat id
fn resolve_target<A, W>(controller: &ChatController<A, TerminalView<W>>, target: &str) -> Option<String>
where
    A: ChatApi,
    W: Write,
{
    if let Ok(index) = target.parse::<usize>() {
        if let Some(id) = controller.view().chat_id_at(index) {
            return Some(id);
        }
    }
    controller.session().chat(target).map(|c| c.id.clone())
}

/// Read a file from disk for upload
pub async fn read_upload(path: &Path) -> std::io::Result<FileUpload> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileUpload::new(name, bytes))
}
