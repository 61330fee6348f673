use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use chatdesk_client::api::endpoints;
use chatdesk_client::{ChatApi, ClientError, Result};
use chatdesk_types::{
    AttachedFile, Chat, ChatListResponse, ChatResponse, ErrorResponse, FileUpload, Message,
    ProcessFileResponse, RenameChatRequest, SendMessageRequest, SendMessageResponse,
};

/// Chat store client over HTTP
pub struct HttpChatApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatApi {
    pub fn new(base_url: &str) -> Self {
        // Ensure base_url doesn't end with a slash
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(reqwest::StatusCode, String)> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        log::debug!("Chat store answered {} ({} bytes)", status, body.len());
        Ok((status, body))
    }

    async fn request_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let (status, body) = self.send(request).await?;

        if !status.is_success() {
            return Err(status_error(status, body));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn status_error(status: reqwest::StatusCode, body: String) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}

#[async_trait(?Send)]
impl ChatApi for HttpChatApi {
    async fn list_chats(&self) -> Result<Vec<Chat>> {
        let response: ChatListResponse = self
            .request_json(self.client.get(self.url(endpoints::GET_CHATS)))
            .await?;
        Ok(response.chats)
    }

    async fn create_chat(&self) -> Result<Chat> {
        let response: ChatResponse = self
            .request_json(self.client.post(self.url(endpoints::CREATE_CHAT)))
            .await?;
        Ok(response.chat)
    }

    async fn get_chat(&self, id: &str) -> Result<Chat> {
        let response: ChatResponse = self
            .request_json(self.client.get(self.url(&endpoints::get_chat(id))))
            .await?;
        Ok(response.chat)
    }

    async fn delete_chat(&self, id: &str) -> Result<()> {
        let _ack: serde_json::Value = self
            .request_json(self.client.delete(self.url(&endpoints::delete_chat(id))))
            .await?;
        Ok(())
    }

    async fn rename_chat(&self, id: &str, title: &str) -> Result<()> {
        let body = RenameChatRequest {
            title: title.to_string(),
        };
        let _ack: serde_json::Value = self
            .request_json(
                self.client
                    .post(self.url(&endpoints::rename_chat(id)))
                    .json(&body),
            )
            .await?;
        Ok(())
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message> {
        let response: SendMessageResponse = self
            .request_json(self.client.post(self.url(endpoints::SEND_MESSAGE)).json(request))
            .await?;
        response.into_assistant_message().ok_or(ClientError::EmptyReply)
    }

    async fn process_file(&self, upload: &FileUpload) -> Result<AttachedFile> {
        let mut part = Part::bytes(upload.bytes.clone()).file_name(upload.name.clone());
        if let Some(mime) = &upload.mime_type {
            part = part.mime_str(mime).map_err(transport)?;
        }
        let form = Form::new().part(endpoints::FILE_FIELD, part);

        let (status, body) = self
            .send(self.client.post(self.url(endpoints::PROCESS_FILE)).multipart(form))
            .await?;

        // The processor reports its own failures as `success: false` with a 4xx/5xx status
        match serde_json::from_str::<ProcessFileResponse>(&body) {
            Ok(parsed) if status.is_success() || parsed.error.is_some() => {
                parsed.into_attachment(&upload.name).map_err(ClientError::Rejected)
            }
            Ok(_) => Err(status_error(status, body)),
            Err(e) if status.is_success() => Err(ClientError::Decode(e.to_string())),
            Err(_) => Err(status_error(status, body)),
        }
    }
}
