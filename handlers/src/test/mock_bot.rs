//! Mock [`imagebot_core::Bot`] that records every outbound call.

use async_trait::async_trait;
use chrono::Utc;
use imagebot_core::{Bot, Chat, InlineKeyboard, Message, Photo, Result, User};
use std::sync::Mutex;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Keyboard { chat_id: i64, text: String, keyboard: InlineKeyboard },
    Edit { chat_id: i64, message_id: String, text: String },
    Photo { chat_id: i64, file_name: String, caption: Option<String> },
    Answer { callback_id: String },
}

#[derive(Default)]
pub struct MockBot {
    pub sent: Mutex<Vec<Sent>>,
}

impl MockBot {
    pub fn calls(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn push(&self, call: Sent) {
        self.sent.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.push(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_with_keyboard(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        self.push(Sent::Keyboard {
            chat_id: chat.id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        });
        Ok(())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        self.push(Sent::Edit {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        self.send_message(chat, text).await?;
        Ok("1".to_string())
    }

    async fn send_photo(&self, chat: &Chat, photo: Photo, caption: Option<&str>) -> Result<()> {
        self.push(Sent::Photo {
            chat_id: chat.id,
            file_name: photo.file_name,
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, _text: Option<&str>) -> Result<()> {
        self.push(Sent::Answer {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }
}

pub fn sample_user() -> User {
    User {
        id: 42,
        username: Some("testuser".to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

pub fn sample_chat() -> Chat {
    Chat {
        id: 123,
        chat_type: "private".to_string(),
    }
}

pub fn sample_message(content: &str) -> Message {
    Message {
        id: "msg-1".to_string(),
        user: sample_user(),
        chat: sample_chat(),
        content: content.to_string(),
        created_at: Utc::now(),
    }
}
