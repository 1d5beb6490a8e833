//! Hand-written provider doubles shared by the orchestrator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use galley_core::{ChatRequest, Completion, FoodImage, ImageRequest, TextRequest, Usage};
use galley_error::{ProviderError, ProviderErrorKind, ProviderResult};
use galley_interface::{ChatProvider, ImageProvider, TextProvider};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ChatScript = dyn Fn(u32, &ChatRequest) -> ProviderResult<Completion> + Send + Sync;

/// Chat provider answering from a script keyed by 1-based call number.
pub struct MockChat {
    name: &'static str,
    script: Box<ChatScript>,
    delay: Option<Duration>,
    calls: AtomicU32,
    requests: Mutex<Vec<ChatRequest>>,
    call_times: Mutex<Vec<tokio::time::Instant>>,
}

impl MockChat {
    pub fn scripted<F>(script: F) -> Arc<Self>
    where
        F: Fn(u32, &ChatRequest) -> ProviderResult<Completion> + Send + Sync + 'static,
    {
        Arc::new(Self {
            name: "mock",
            script: Box::new(script),
            delay: None,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            call_times: Mutex::new(Vec::new()),
        })
    }

    /// Always answers `content` with 1000 prompt and 500 completion tokens.
    pub fn replying(content: &'static str) -> Arc<Self> {
        Self::scripted(move |_, _| Ok(chat_completion(content)))
    }

    /// Always fails with `kind`.
    pub fn failing(kind: ProviderErrorKind) -> Arc<Self> {
        Self::scripted(move |_, _| Err(ProviderError::new(kind.clone())))
    }

    /// Answers only after `delay`.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: "mock",
            script: Box::new(|_, _| Ok(chat_completion("too late"))),
            delay: Some(delay),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            call_times: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_times(&self) -> Vec<tokio::time::Instant> {
        self.call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn complete(&self, request: &ChatRequest) -> ProviderResult<Completion> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());
        self.call_times.lock().unwrap().push(tokio::time::Instant::now());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.script)(call, request)
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }

    fn model_name(&self) -> &str {
        "gpt-4o-mini"
    }
}

pub fn chat_completion(content: &str) -> Completion {
    Completion::new(content.to_string(), Some(Usage::new(1000, 500)), "gpt-4o-mini")
}

/// Text provider that echoes a fixed JSON answer.
pub struct MockText {
    answer: &'static str,
    calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl MockText {
    pub fn replying(answer: &'static str) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextProvider for MockText {
    async fn generate_text(&self, request: &TextRequest) -> ProviderResult<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        Ok(Completion::new(
            self.answer.to_string(),
            Some(Usage::new(200, 100)),
            "mistralai/Mistral-7B-Instruct-v0.3",
        ))
    }

    fn provider_name(&self) -> &'static str {
        "mock-text"
    }

    fn model_name(&self) -> &str {
        "mistralai/Mistral-7B-Instruct-v0.3"
    }
}

/// Image provider that fails for prompts containing a marker.
pub struct MockImage {
    name: &'static str,
    fail_when: Option<&'static str>,
    status: (u16, &'static str),
    calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl MockImage {
    pub fn ok(name: &'static str) -> Arc<Self> {
        Self::failing_on(name, None)
    }

    pub fn always_failing(name: &'static str) -> Arc<Self> {
        Self::failing_on(name, Some(""))
    }

    /// Fails every prompt with the given HTTP status.
    pub fn always_failing_with(name: &'static str, status: u16, reason: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail_when: Some(""),
            status: (status, reason),
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_on(name: &'static str, marker: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail_when: marker,
            status: (400, "Bad Request"),
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub fn sample_image() -> FoodImage {
    FoodImage {
        image_url: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        image_data: Some("iVBORw0KGgo=".to_string()),
        mime_type: Some("image/png".to_string()),
    }
}

#[async_trait]
impl ImageProvider for MockImage {
    async fn generate_image(&self, request: &ImageRequest) -> ProviderResult<Completion<FoodImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match self.fail_when {
            Some(marker) if request.prompt.contains(marker) => {
                Err(ProviderError::new(ProviderErrorKind::Api {
                    status: self.status.0,
                    reason: self.status.1.to_string(),
                    message: format!("{} rejected the prompt", self.name),
                }))
            }
            _ => Ok(Completion::new(sample_image(), None, "image-model")),
        }
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}
