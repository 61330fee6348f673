use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use chatdesk_client::api::endpoints;
use chatdesk_client::{ChatApi, ClientError, Result};
use chatdesk_types::{
    AttachedFile, Chat, ChatListResponse, ChatResponse, ErrorResponse, FileUpload, Message,
    ProcessFileResponse, RenameChatRequest, SendMessageRequest, SendMessageResponse,
};

/// Chat store client over the browser's `fetch`, using same-origin paths
#[derive(Debug, Clone, Default)]
pub struct GlooChatApi;

impl GlooChatApi {
    pub fn new() -> Self {
        Self
    }
}

fn transport(err: impl std::fmt::Display) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn js_error(err: JsValue) -> ClientError {
    ClientError::Transport(format!("{:?}", err))
}

async fn read_body(response: Response) -> Result<(u16, String)> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    log::debug!("Chat store answered {} ({} bytes)", status, body.len());
    Ok((status, body))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn status_error(status: u16, body: String) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    ClientError::Status { status, message }
}

fn decode_json<T: DeserializeOwned>(status: u16, body: String) -> Result<T> {
    if !is_success(status) {
        return Err(status_error(status, body));
    }
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// `success: false` bodies are application errors whatever the status
fn decode_process_file(status: u16, body: String, uploaded_name: &str) -> Result<AttachedFile> {
    match serde_json::from_str::<ProcessFileResponse>(&body) {
        Ok(parsed) if is_success(status) || parsed.error.is_some() => parsed
            .into_attachment(uploaded_name)
            .map_err(ClientError::Rejected),
        Ok(_) => Err(status_error(status, body)),
        Err(e) if is_success(status) => Err(ClientError::Decode(e.to_string())),
        Err(_) => Err(status_error(status, body)),
    }
}

async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(transport)?;
    let (status, body) = read_body(response).await?;
    decode_json(status, body)
}

fn upload_form(upload: &FileUpload) -> Result<FormData> {
    let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);

    let blob = match &upload.mime_type {
        Some(mime) => {
            let options = BlobPropertyBag::new();
            options.set_type(mime);
            Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        }
        None => Blob::new_with_u8_array_sequence(&parts),
    }
    .map_err(js_error)?;

    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(endpoints::FILE_FIELD, &blob, &upload.name)
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl ChatApi for GlooChatApi {
    async fn list_chats(&self) -> Result<Vec<Chat>> {
        let response: ChatListResponse =
            fetch_json(Request::get(endpoints::GET_CHATS)).await?;
        Ok(response.chats)
    }

    async fn create_chat(&self) -> Result<Chat> {
        let response: ChatResponse =
            fetch_json(Request::post(endpoints::CREATE_CHAT)).await?;
        Ok(response.chat)
    }

    async fn get_chat(&self, id: &str) -> Result<Chat> {
        let response: ChatResponse =
            fetch_json(Request::get(&endpoints::get_chat(id))).await?;
        Ok(response.chat)
    }

    async fn delete_chat(&self, id: &str) -> Result<()> {
        let _ack: serde_json::Value =
            fetch_json(Request::delete(&endpoints::delete_chat(id))).await?;
        Ok(())
    }

    async fn rename_chat(&self, id: &str, title: &str) -> Result<()> {
        let body = RenameChatRequest {
            title: title.to_string(),
        };
        let request = Request::post(&endpoints::rename_chat(id))
            .json(&body)
            .map_err(transport)?;
        let response = request.send().await.map_err(transport)?;
        let (status, body) = read_body(response).await?;
        let _ack: serde_json::Value = decode_json(status, body)?;
        Ok(())
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message> {
        let request = Request::post(endpoints::SEND_MESSAGE)
            .json(request)
            .map_err(transport)?;
        let response = request.send().await.map_err(transport)?;
        let (status, body) = read_body(response).await?;
        let reply: SendMessageResponse = decode_json(status, body)?;
        reply.into_assistant_message().ok_or(ClientError::EmptyReply)
    }

    async fn process_file(&self, upload: &FileUpload) -> Result<AttachedFile> {
        let form = upload_form(upload)?;
        let request = Request::post(endpoints::PROCESS_FILE)
            .body(form)
            .map_err(transport)?;
        let response = request.send().await.map_err(transport)?;
        let (status, body) = read_body(response).await?;
        decode_process_file(status, body, &upload.name)
    }
}
