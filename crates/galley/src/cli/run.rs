//! Command handlers.

use super::commands::{Commands, TextBackend};
use anyhow::{Context, Result};
use galley::{ChatMessage, GalleyConfig, Orchestrator};
use galley_models::normalize_image_bytes;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, instrument};

/// Execute `command` against an orchestrator built from the environment.
#[instrument(skip_all)]
pub async fn run_command(command: Commands, config: GalleyConfig) -> Result<()> {
    match command {
        Commands::Config => print_json(&config),
        Commands::Chat {
            message,
            country,
            request,
        } => {
            let orchestrator = build_orchestrator(&config)?;
            let messages: Vec<ChatMessage> = message.into_iter().map(ChatMessage::user).collect();
            let response = orchestrator
                .generate_ai_response(&messages, &country, &request.to_options())
                .await;
            print_json(&response)
        }
        Commands::Vision {
            image,
            prompt,
            country,
            request,
        } => {
            let orchestrator = build_orchestrator(&config)?;
            let image_url = resolve_image(&image).await?;
            let response = orchestrator
                .generate_ai_vision_response(&image_url, &prompt, &country, &request.to_options())
                .await;
            print_json(&response)
        }
        Commands::Image { prompt, request } => {
            let orchestrator = build_orchestrator(&config)?;
            let response = orchestrator
                .generate_food_image(&prompt, &request.to_options())
                .await;
            print_json(&response)
        }
        Commands::Plating {
            dish,
            ingredients,
            instructions,
            request,
        } => {
            let orchestrator = build_orchestrator(&config)?;
            let images = orchestrator
                .generate_food_images(
                    &dish,
                    &ingredients,
                    &request.to_options(),
                    instructions.as_deref(),
                )
                .await;
            print_json(&images)
        }
        Commands::Text {
            prompt,
            provider,
            request,
        } => {
            let orchestrator = build_orchestrator(&config)?;
            let options = request.to_options();
            let response = match provider {
                TextBackend::Groq => orchestrator.generate_text_with_groq(&prompt, &options).await,
                TextBackend::Huggingface => {
                    orchestrator
                        .generate_text_with_huggingface(&prompt, &options)
                        .await
                }
            };
            print_json(&response)
        }
    }
}

fn build_orchestrator(config: &GalleyConfig) -> Result<Orchestrator> {
    let settings = galley::AiSettings::from_env();
    debug!(?settings, "Loaded AI settings");
    Orchestrator::from_settings(&settings, config).context("Failed to configure AI providers")
}

/// URLs pass through; anything else is read as a local image file.
async fn resolve_image(image: &str) -> Result<String> {
    if image.starts_with("http://") || image.starts_with("https://") || image.starts_with("data:")
    {
        return Ok(image.to_string());
    }

    let path = Path::new(image);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let normalized = normalize_image_bytes(&bytes, None)
        .with_context(|| format!("Unsupported image {}", path.display()))?;
    Ok(normalized.image_url)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
