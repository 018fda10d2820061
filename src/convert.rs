//! Conversion orchestration: encode, build, send, extract.
//!
//! [`Converter::start`] takes `&mut self`, so one converter can never run two
//! conversions at once. Every failure is folded into
//! [`ConversionState::Failed`] with a single-line message.

use crate::ai::client::NO_CODE_MESSAGE;
use crate::ai::{self, CompletionService, PreparedInput};
use crate::extract::extract_code;
use crate::input::InputModality;
use crate::models::{ConversionState, ModelSettings};
use crate::{Error, Result};
use tracing::{error, info};

pub struct Converter {
    service: Box<dyn CompletionService>,
    models: ModelSettings,
    state: ConversionState,
}

impl Converter {
    pub fn new(service: Box<dyn CompletionService>, models: ModelSettings) -> Self {
        Self {
            service,
            models,
            state: ConversionState::Idle,
        }
    }

    /// `InProgress` only lasts inside `start`, so callers see `Idle` or a terminal state.
    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    pub fn last_code(&self) -> Option<&str> {
        match &self.state {
            ConversionState::Completed(code) => Some(code),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            ConversionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Run one conversion to a terminal state, discarding any previous result.
    pub async fn start(&mut self, input: &InputModality) -> &ConversionState {
        if input.is_empty() {
            info!("No input provided; skipping conversion");
            self.state = ConversionState::Failed(Error::EmptyInput.to_string());
            return &self.state;
        }

        self.state = ConversionState::InProgress;
        info!("Conversion started");

        self.state = match self.run(input).await {
            Ok(code) => {
                info!("Conversion completed ({} chars)", code.len());
                ConversionState::Completed(code)
            }
            Err(e) => {
                error!("Conversion failed: {}", e);
                ConversionState::Failed(e.to_string())
            }
        };
        &self.state
    }

    async fn run(&self, input: &InputModality) -> Result<String> {
        let encoded;
        let prepared = match input {
            InputModality::Image(handle) => {
                encoded = ai::encode(handle).await?;
                PreparedInput::Image(&encoded)
            }
            InputModality::StructuredText(text) => PreparedInput::StructuredText(text),
            InputModality::None => return Err(Error::EmptyInput),
        };

        let request = ai::build_request(prepared, &self.models);
        let completion = self.service.send(&request).await?;

        let text = completion
            .first_text()
            .ok_or_else(|| Error::Service(NO_CODE_MESSAGE.to_string()))?;
        Ok(extract_code(text))
    }
}
