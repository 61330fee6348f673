//! Client-side chat session logic for chatdesk
//!
//! The [`ChatController`] owns a single [`ChatSession`] and drives a
//! transport ([`ChatApi`]) and a view ([`ChatView`]). Front-ends provide the
//! two trait implementations: the browser crate talks `fetch` and the DOM,
//! the terminal app talks `reqwest` and stdout.

pub mod api;
pub mod controller;
pub mod error;
pub mod markdown;
pub mod render;
pub mod session;
pub mod utils;
pub mod view;

pub use api::ChatApi;
pub use controller::{ChatController, SendOutcome, SEND_FAILED_MESSAGE};
pub use error::{ClientError, Result};
pub use render::{RenderMode, RenderedMessage, Renderer};
pub use session::{AttachmentState, ChatSession, SendState};
pub use view::ChatView;

pub use chatdesk_types as types;
