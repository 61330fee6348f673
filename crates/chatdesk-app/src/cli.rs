use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for chatdesk
#[derive(Parser, Debug)]
#[command(name = "chatdesk")]
#[command(about = "Terminal client for a chatdesk chat store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat store base URL (e.g., http://127.0.0.1:5000)
    #[arg(long, env = "CHATDESK_URL", value_name = "URL")]
    pub server_url: Option<String>,

    /// Configuration file (default: ~/.chatdesk/config.toml)
    #[arg(long, env = "CHATDESK_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hide message timestamps
    #[arg(long)]
    pub no_timestamps: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List the chats stored on the server
    Chats,

    /// Send a single message and print the reply
    Send {
        /// Message text
        #[arg(required_unless_present = "file")]
        text: Vec<String>,

        /// Send into an existing chat instead of a new one
        #[arg(long, value_name = "ID")]
        chat: Option<String>,

        /// Attach a document or image (pdf, docx, txt, png, jpg, ...)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Delete a chat by id
    Delete {
        id: String,
    },
}
