//! Adapters from Telegram (teloxide) types to imagebot_core types.

use imagebot_core::{CallbackQuery, Chat, Incoming, Message, ToCoreIncoming, ToCoreUser, User};
use teloxide::types::UpdateKind;

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn unknown_user() -> User {
    User {
        id: 0,
        username: None,
        first_name: None,
        last_name: None,
    }
}

fn core_chat(chat: &teloxide::types::Chat) -> Chat {
    let chat_type = if chat.is_private() {
        "private"
    } else if chat.is_group() {
        "group"
    } else if chat.is_supergroup() {
        "supergroup"
    } else {
        "channel"
    };
    Chat {
        id: chat.id.0,
        chat_type: chat_type.to_string(),
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`]. Messages without text convert to `None`.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    pub fn to_core(&self) -> Option<Message> {
        let text = self.0.text()?;
        Some(Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(unknown_user),
            chat: core_chat(&self.0.chat),
            content: text.to_string(),
            created_at: self.0.date,
        })
    }
}

/// Wraps a teloxide CallbackQuery for conversion to core [`CallbackQuery`].
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> TelegramCallbackWrapper<'a> {
    pub fn to_core(&self) -> CallbackQuery {
        let q = self.0;
        CallbackQuery {
            id: q.id.0.clone(),
            user: TelegramUserWrapper(&q.from).to_core(),
            chat: q.message.as_ref().map(|m| core_chat(m.chat())),
            message_id: q.message.as_ref().map(|m| m.id().to_string()),
            data: q.data.clone().unwrap_or_default(),
        }
    }
}

/// Wraps a teloxide Update. Text messages and callback queries convert; everything else is ignored.
pub struct TelegramUpdateWrapper<'a>(pub &'a teloxide::types::Update);

impl<'a> ToCoreIncoming for TelegramUpdateWrapper<'a> {
    fn to_core(&self) -> Option<Incoming> {
        match &self.0.kind {
            UpdateKind::Message(msg) => TelegramMessageWrapper(msg).to_core().map(Incoming::Message),
            UpdateKind::CallbackQuery(q) => {
                Some(Incoming::Callback(TelegramCallbackWrapper(q).to_core()))
            }
            _ => None,
        }
    }
}
