//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use galley::{RequestOptions, ResponseFormat};
use std::path::PathBuf;
use std::time::Duration;

/// Galley - AI request orchestration for restaurant operations
#[derive(Parser, Debug)]
#[command(name = "galley")]
#[command(about = "Send chat, vision, image and text requests through the Galley orchestrator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file to use instead of the default search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the kitchen assistant a question
    Chat {
        /// Message to send (repeat for a multi-turn user message list)
        #[arg(required = true)]
        message: Vec<String>,

        /// Country code used for units and currency
        #[arg(long, default_value = "US")]
        country: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Ask about an image
    Vision {
        /// Image URL, data URL, or path to a local image file
        #[arg(long)]
        image: String,

        /// Question about the image
        prompt: String,

        /// Country code used for units and currency
        #[arg(long, default_value = "US")]
        country: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Generate one dish image
    Image {
        /// Image description
        prompt: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Generate a dish in all four plating styles
    Plating {
        /// Name of the dish
        dish: String,

        /// Ingredient to show (repeatable)
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,

        /// Extra plating notes
        #[arg(long)]
        instructions: Option<String>,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Raw text generation
    Text {
        /// Prompt text
        prompt: String,

        /// Backend to use
        #[arg(long, value_enum, default_value_t = TextBackend::Groq)]
        provider: TextBackend,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Print the effective configuration
    Config,
}

/// Raw text backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextBackend {
    /// Groq chat completions
    Groq,
    /// HuggingFace Inference (JSON-only output)
    Huggingface,
}

/// Options shared by every request command.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Model override
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum completion tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Ask for a JSON object response
    #[arg(long)]
    pub json: bool,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Abort each provider attempt after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl RequestArgs {
    /// Convert to orchestrator options.
    pub fn to_options(&self) -> RequestOptions {
        let mut options = RequestOptions::default().with_cache(!self.no_cache);
        if let Some(model) = &self.model {
            options = options.with_model(model.clone());
        }
        if let Some(temperature) = self.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }
        if self.json {
            options = options.with_response_format(ResponseFormat::JsonObject);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options = options.with_timeout(Duration::from_millis(timeout_ms));
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn request_args_map_to_options() {
        let cli = Cli::parse_from([
            "galley",
            "text",
            "List three uses for shallots",
            "--provider",
            "huggingface",
            "--max-tokens",
            "120",
            "--no-cache",
            "--json",
        ]);
        let Commands::Text {
            provider, request, ..
        } = cli.command
        else {
            panic!("expected text command");
        };
        assert_eq!(provider, TextBackend::Huggingface);

        let options = request.to_options();
        assert_eq!(options.max_tokens, Some(120));
        assert!(!options.use_cache());
        assert_eq!(options.response_format, ResponseFormat::JsonObject);
    }
}
