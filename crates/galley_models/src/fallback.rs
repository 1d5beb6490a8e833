//! Two-vendor image generation.

use async_trait::async_trait;
use galley_core::{Completion, FoodImage, ImageRequest};
use galley_error::{ProviderError, ProviderErrorKind, ProviderResult};
use galley_interface::ImageProvider;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Progress of one fallback attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum Stage {
    NotStarted,
    TryPrimary,
    TryFallback,
    Success,
    Failed,
}

/// Image provider that retries the same prompt on a secondary vendor.
///
/// A success from either vendor looks the same to the caller. When both
/// fail, the error carries both failures. A model override names a model of
/// the primary vendor, so the secondary vendor always runs its own default.
#[derive(Clone)]
pub struct FallbackImageClient {
    primary: Arc<dyn ImageProvider>,
    fallback: Option<Arc<dyn ImageProvider>>,
}

impl std::fmt::Debug for FallbackImageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackImageClient")
            .field("primary", &self.primary.provider_name())
            .field(
                "fallback",
                &self.fallback.as_ref().map(|fallback| fallback.provider_name()),
            )
            .finish()
    }
}

impl FallbackImageClient {
    /// Primary vendor only.
    pub fn new(primary: Arc<dyn ImageProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Add a secondary vendor.
    pub fn with_fallback(mut self, fallback: Arc<dyn ImageProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn advance(stage: &mut Stage, next: Stage) {
        debug!(from = %stage, to = %next, "Image fallback stage");
        *stage = next;
    }
}

#[async_trait]
impl ImageProvider for FallbackImageClient {
    #[instrument(skip(self, request), fields(primary = self.primary.provider_name()))]
    async fn generate_image(&self, request: &ImageRequest) -> ProviderResult<Completion<FoodImage>> {
        let mut stage = Stage::NotStarted;

        Self::advance(&mut stage, Stage::TryPrimary);
        let primary_error = match self.primary.generate_image(request).await {
            Ok(completion) => {
                Self::advance(&mut stage, Stage::Success);
                return Ok(completion);
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            Self::advance(&mut stage, Stage::Failed);
            return Err(primary_error);
        };

        warn!(
            error = %primary_error.message(),
            fallback = fallback.provider_name(),
            "Primary image vendor failed, trying fallback"
        );
        Self::advance(&mut stage, Stage::TryFallback);

        let retry = ImageRequest {
            model: None,
            ..request.clone()
        };
        match fallback.generate_image(&retry).await {
            Ok(completion) => {
                Self::advance(&mut stage, Stage::Success);
                Ok(completion)
            }
            Err(fallback_error) => {
                Self::advance(&mut stage, Stage::Failed);
                Err(ProviderError::new(ProviderErrorKind::AllVendorsFailed {
                    primary: primary_error.message(),
                    fallback: Box::new(fallback_error.kind),
                }))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        self.primary.provider_name()
    }
}
