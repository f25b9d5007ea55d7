// Shared helpers for integration tests; not every test file uses all of them.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crop_doctor::{GenerativeModel, ModelError, Part, UploadedImage};
use tokio::sync::Semaphore;

/// A model that replays canned responses in order and records every request.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
    calls: Mutex<Vec<Vec<Part>>>,
    gate: Option<Semaphore>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Result<String, ModelError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Like [`ScriptedModel::new`], but every call waits for a permit from [`ScriptedModel::release`].
    pub fn gated(responses: Vec<Result<String, ModelError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
            gate: Some(Semaphore::new(0)),
        })
    }

    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn calls(&self) -> Vec<Vec<Part>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String, ModelError> {
        self.calls.lock().unwrap().push(parts);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Other("no scripted response".to_string())))
    }

    fn name(&self) -> &str {
        "scripted-model"
    }
}

pub fn jpeg(name: &str, bytes: &[u8]) -> UploadedImage {
    UploadedImage::new(name, Some("image/jpeg"), bytes.to_vec())
}

/// Text of the first part of a recorded request.
pub fn first_text(parts: &[Part]) -> &str {
    parts[0].as_text().expect("first part is text")
}

pub const BOUNDARY: &str = "crop-doctor-test-boundary";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_image(file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, file_name, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// A multipart body without an `image` field.
pub fn multipart_without_image() -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nnothing\r\n--{b}--\r\n",
        b = BOUNDARY
    )
    .into_bytes()
}
