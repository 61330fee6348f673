//! Terminal front-end for the chatdesk chat store.

pub mod app;
pub mod cli;
pub mod config;
pub mod http;
pub mod logging;
pub mod repl;
pub mod terminal;

pub use cli::{Cli, Commands};
pub use config::{normalize_server_url, ClientConfig, DEFAULT_SERVER_URL};
pub use http::HttpChatApi;
pub use terminal::TerminalView;
