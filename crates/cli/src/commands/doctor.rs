//! `pumpwise doctor`: Diagnose configuration.

use pumpwise_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Pumpwise Doctor — Configuration Check");
    println!("=======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — using defaults (run `pumpwise onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config file and re-run doctor.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key — set OPENAI_API_KEY or api_key in config.toml");
        issues += 1;
    }

    match pumpwise_providers::build_chain(&config) {
        Ok(chain) => {
            println!(
                "  ✅ Provider chain: {} (model {})",
                chain.name(),
                config.model_for(&config.default_provider)
            );
            for name in &config.fallback {
                println!("     ↳ fallback: {name} (model {})", config.model_for(name));
            }
        }
        Err(e) => {
            println!("  ❌ Provider setup failed: {e}");
            issues += 1;
        }
    }

    let export_path = config.export.default_path();
    match export_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) if !dir.is_dir() => {
            println!("  ⚠️  Export directory missing: {} (created on first export)", dir.display());
        }
        _ => println!("  ✅ Export target: {}", export_path.display()),
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
