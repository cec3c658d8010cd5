use serde::{Deserialize, Serialize};

/// A chat message as served by `GET /chat/get/`.
///
/// `id` is absent only for messages the client synthesized itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub is_user: bool,
}

impl Message {
    pub fn is_mine(&self, current_user: Option<&str>) -> bool {
        if self.is_user {
            return true;
        }
        matches!((self.user.as_deref(), current_user), (Some(sender), Some(me)) if sender == me)
    }

    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|text| !text.is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SendResponse {
    pub status: String,
}

impl SendResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// What the composer hands to the send path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub image: Option<ImageAttachment>,
}

impl OutgoingMessage {
    pub fn new(text: &str, image: Option<ImageAttachment>) -> Self {
        let trimmed = text.trim();
        Self {
            content: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            image,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.image.is_none()
    }
}
