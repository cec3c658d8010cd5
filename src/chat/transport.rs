use crate::types::{Message, MessagesResponse, OutgoingMessage, SendResponse};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

pub const GET_PATH: &str = "/chat/get/";
pub const SEND_PATH: &str = "/chat/send/";
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unusable attachment: {0}")]
    Attachment(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

/// The two endpoints the chat talks to. No retries happen here; callers
/// decide what a failure means.
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn fetch_messages(&self) -> ChatResult<Vec<Message>>;

    async fn send_message(&self, draft: &OutgoingMessage) -> ChatResult<SendResponse>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, csrf_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            csrf_token,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn form_for(draft: &OutgoingMessage) -> ChatResult<Form> {
        let mut form = Form::new();
        if let Some(text) = &draft.content {
            form = form.text("content", text.clone());
        }
        if let Some(image) = &draft.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime)
                .map_err(|err| ChatError::Attachment(err.to_string()))?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpTransport {
    async fn fetch_messages(&self) -> ChatResult<Vec<Message>> {
        let response = self.client.get(self.endpoint(GET_PATH)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: MessagesResponse = serde_json::from_str(&body)?;
        Ok(parsed.messages)
    }

    async fn send_message(&self, draft: &OutgoingMessage) -> ChatResult<SendResponse> {
        let mut request = self
            .client
            .post(self.endpoint(SEND_PATH))
            .multipart(Self::form_for(draft)?);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageAttachment;

    #[test]
    fn endpoints_join_without_double_slash() {
        let transport = HttpTransport::new("http://localhost:8000/", None);
        assert_eq!(
            transport.endpoint(GET_PATH),
            "http://localhost:8000/chat/get/"
        );
        assert_eq!(
            transport.endpoint(SEND_PATH),
            "http://localhost:8000/chat/send/"
        );
    }

    #[test]
    fn rejects_bad_mime() {
        let draft = OutgoingMessage::new(
            "",
            Some(ImageAttachment {
                file_name: "x.png".into(),
                mime: "not a mime".into(),
                bytes: vec![1, 2, 3],
            }),
        );
        assert!(matches!(
            HttpTransport::form_for(&draft),
            Err(ChatError::Attachment(_))
        ));
    }

    #[test]
    fn status_error_reads_well() {
        let err = ChatError::Status {
            status: 400,
            body: r#"{"status": "error"}"#.into(),
        };
        assert_eq!(err.to_string(), r#"server answered 400: {"status": "error"}"#);
    }
}
