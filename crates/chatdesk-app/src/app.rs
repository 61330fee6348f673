use anyhow::{anyhow, bail, Context, Result};
use std::io::Stdout;
use std::path::Path;

use chatdesk_client::{ChatApi, ChatController, ChatView, SendOutcome};

use crate::cli::{Cli, Commands};
use crate::config::ClientConfig;
use crate::http::HttpChatApi;
use crate::repl::{read_upload, run_repl};
use crate::terminal::TerminalView;

pub type TerminalController = ChatController<HttpChatApi, TerminalView<Stdout>>;

fn build_controller(config: &ClientConfig) -> TerminalController {
    ChatController::new(
        HttpChatApi::new(&config.server_url),
        TerminalView::stdout(config.show_timestamps),
    )
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_cli(&cli)?;
    log::debug!("Using chat store at {}", config.server_url);

    match cli.command {
        Some(Commands::Chats) => list_chats(&config).await,
        Some(Commands::Send { text, chat, file }) => {
            send_once(&config, &text.join(" "), chat.as_deref(), file.as_deref()).await
        }
        Some(Commands::Delete { id }) => delete_chat(&config, &id).await,
        None => {
            let controller = build_controller(&config);
            run_repl(&controller, &config).await
        }
    }
}

async fn list_chats(config: &ClientConfig) -> Result<()> {
    let api = HttpChatApi::new(&config.server_url);
    let chats = api
        .list_chats()
        .await
        .with_context(|| format!("Failed to load chats from {}", config.server_url))?;

    let view = TerminalView::stdout(config.show_timestamps);
    view.render_chat_list(&chats, None);
    view.print_chat_list();
    Ok(())
}

async fn send_once(
    config: &ClientConfig,
    text: &str,
    chat: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let controller = build_controller(config);

    if let Some(id) = chat {
        controller
            .load_chat(id)
            .await
            .with_context(|| format!("Failed to open chat {}", id))?;
    }

    if let Some(path) = file {
        let upload = read_upload(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        controller
            .attach_file(upload)
            .await
            .with_context(|| format!("Failed to process {}", path.display()))?;
    }

    match controller.send_message(text).await {
        SendOutcome::Delivered(_) => Ok(()),
        SendOutcome::Skipped => bail!("Nothing to send"),
        SendOutcome::Blocked => bail!("Another request is still in progress"),
        SendOutcome::Failed(e) => Err(anyhow!(e).context("Failed to send message")),
    }
}

async fn delete_chat(config: &ClientConfig, id: &str) -> Result<()> {
    let api = HttpChatApi::new(&config.server_url);
    api.delete_chat(id)
        .await
        .with_context(|| format!("Failed to delete chat {}", id))?;

    TerminalView::stdout(config.show_timestamps).info(&format!("Deleted chat {}", id));
    Ok(())
}
