pub mod chat;
pub mod doctor;
pub mod export;
pub mod generate;
pub mod onboard;
pub mod options;
pub mod spec_input;

use pumpwise_config::AppConfig;

/// Providers that run locally and accept any key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "vllm", "llamacpp", "llama.cpp"];

/// Load config and fail early with setup instructions when no key is set.
pub fn load_config_with_key() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.has_api_key() || KEYLESS_PROVIDERS.contains(&config.default_provider.as_str()) {
        return Ok(config);
    }

    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    OPENAI_API_KEY   = 'sk-...'   (for OpenAI direct)");
    eprintln!("    PUMPWISE_API_KEY = 'sk-...'   (generic)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    Err("No API key found. See above for setup instructions.".into())
}
