//! Modality-specific request construction.
//!
//! Images go to the vision model with a system role, an instruction part and
//! a high-detail image part at temperature 0. Design text goes to the text
//! model as a single user message that embeds the export verbatim.

use super::encode::EncodedImage;
use super::types::{ChatMessage, ChatMessageContent, CompletionRequest, ImageUrl, MessagePart};
use crate::models::ModelSettings;
use crate::prompts;

const IMAGE_DETAIL: &str = "high";

/// Input that is ready to be sent; images are already encoded.
#[derive(Debug, Clone, Copy)]
pub enum PreparedInput<'a> {
    StructuredText(&'a str),
    Image(&'a EncodedImage),
}

pub fn build_request(input: PreparedInput<'_>, models: &ModelSettings) -> CompletionRequest {
    match input {
        PreparedInput::Image(image) => build_image_request(image, models),
        PreparedInput::StructuredText(design) => build_text_request(design, models),
    }
}

fn build_image_request(image: &EncodedImage, models: &ModelSettings) -> CompletionRequest {
    let user_message = ChatMessage::user(ChatMessageContent::Parts(vec![
        MessagePart::Text {
            text: prompts::VISION_USER.trim().to_string(),
        },
        MessagePart::ImageUrl {
            image_url: ImageUrl {
                url: image.as_str().to_string(),
                detail: Some(IMAGE_DETAIL.to_string()),
            },
        },
    ]));

    CompletionRequest {
        model: models.vision_model.clone(),
        messages: vec![
            ChatMessage::system(prompts::VISION_SYSTEM.trim()),
            user_message,
        ],
        max_tokens: models.max_tokens,
        temperature: 0.0,
    }
}

fn build_text_request(design: &str, models: &ModelSettings) -> CompletionRequest {
    let prompt = prompts::render(prompts::DESIGN_USER.trim(), &[("design", design)]);

    CompletionRequest {
        model: models.text_model.clone(),
        messages: vec![ChatMessage::user(ChatMessageContent::Text(prompt))],
        max_tokens: models.max_tokens,
        temperature: models.text_temperature,
    }
}
