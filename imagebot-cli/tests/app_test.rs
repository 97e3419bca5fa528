//! Wiring tests: the assembled chain routes each update kind to the right handler, and
//! `generate_to_dir` writes every image it receives.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image_generation_client::{
    GeneratedImage, GenerationError, GenerationRequest, ImageGenConfig, ImageGenerator,
    ProviderKind,
};
use imagebot_cli::{build_chain, generate::generate_to_dir};
use imagebot_core::{
    Bot, CallbackQuery, Chat, HandlerResponse, Incoming, InlineKeyboard, Message, Photo, Result,
    User,
};

#[derive(Default)]
struct RecordingBot {
    log: Mutex<Vec<String>>,
}

impl RecordingBot {
    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        self.log.lock().unwrap().push(format!("text:{text}"));
        Ok(())
    }
    async fn send_message_with_keyboard(
        &self,
        _chat: &Chat,
        _text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("keyboard:{}", keyboard.rows[0].len()));
        Ok(())
    }
    async fn edit_message(&self, _chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        self.log.lock().unwrap().push(format!("edit:{message_id}:{text}"));
        Ok(())
    }
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        self.send_message(chat, text).await?;
        Ok("1".into())
    }
    async fn send_photo(&self, _chat: &Chat, photo: Photo, caption: Option<&str>) -> Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("photo:{}:{}", photo.file_name, caption.unwrap_or("")));
        Ok(())
    }
    async fn answer_callback(&self, callback_id: &str, _text: Option<&str>) -> Result<()> {
        self.log.lock().unwrap().push(format!("answer:{callback_id}"));
        Ok(())
    }
}

struct StaticGenerator;

fn png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[async_trait]
impl ImageGenerator for StaticGenerator {
    fn provider_name(&self) -> &str {
        "static"
    }

    async fn generate_image(
        &self,
        request: &GenerationRequest,
    ) -> image_generation_client::Result<Vec<GeneratedImage>> {
        if request.prompt == "fail" {
            return Err(GenerationError::NoImages);
        }
        (0..request.num_images)
            .map(|_| {
                GeneratedImage::decode(png(), &request.prompt)
                    .map_err(|e| GenerationError::Submission(e.to_string()))
            })
            .collect()
    }
}

fn image_config() -> ImageGenConfig {
    ImageGenConfig {
        provider: ProviderKind::FusionBrain,
        kandinsky_api_key: None,
        kandinsky_secret_key: None,
        fusionbrain_url: None,
        kandinsky_url: None,
        cache_pipeline: false,
        openai_api_key: None,
        openai_base_url: None,
        dalle_model: "dall-e-3".into(),
        poll_max_attempts: None,
        poll_interval_secs: None,
        poll_transport_retries: None,
        width: 1024,
        height: 1024,
    }
}

fn user() -> User {
    User {
        id: 1,
        username: None,
        first_name: Some("T".into()),
        last_name: None,
    }
}

fn chat() -> Chat {
    Chat {
        id: 10,
        chat_type: "private".into(),
    }
}

fn text(content: &str) -> Incoming {
    Incoming::Message(Message {
        id: "3".into(),
        user: user(),
        chat: chat(),
        content: content.into(),
        created_at: chrono::Utc::now(),
    })
}

#[tokio::test]
async fn test_chain_routes_commands_callbacks_and_text() {
    let bot = Arc::new(RecordingBot::default());
    let chain = build_chain(bot.clone(), Arc::new(StaticGenerator), &image_config());

    assert_eq!(chain.handle(&text("/start")).await.unwrap(), HandlerResponse::Stop);
    chain
        .handle(&Incoming::Callback(CallbackQuery {
            id: "cb".into(),
            user: user(),
            chat: Some(chat()),
            message_id: Some("8".into()),
            data: "option1".into(),
        }))
        .await
        .unwrap();
    chain.handle(&text("/image a red bicycle")).await.unwrap();
    chain.handle(&text("hello")).await.unwrap();

    let log = bot.log();
    assert_eq!(log[0], "keyboard:3");
    assert_eq!(log[1], "answer:cb");
    assert_eq!(log[2], "edit:8:You chose option 1!");
    assert!(log[3].starts_with("text:"));
    assert_eq!(log[4], "photo:image-1.png:a red bicycle");
    assert_eq!(log[5], format!("edit:1:{}", image_handlers::MSG_DONE));
    assert_eq!(log[6], "text:You said: hello");
}

#[tokio::test]
async fn test_generate_to_dir_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("images");
    let request = GenerationRequest::new("cat").with_num_images(2);

    let written = generate_to_dir(&StaticGenerator, &request, &out).await.unwrap();

    assert_eq!(written.len(), 2);
    assert!(written[1].ends_with("image-2.png"));
    for path in written {
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }
}

#[tokio::test]
async fn test_generate_to_dir_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let request = GenerationRequest::new("fail");

    let err = generate_to_dir(&StaticGenerator, &request, dir.path())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("static"));
}
