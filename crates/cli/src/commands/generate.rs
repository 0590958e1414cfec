//! `pumpwise generate`: One-shot suggested solution.

use super::export::export_solution;
use super::load_config_with_key;
use super::spec_input::SpecArgs;
use pumpwise_session::ConversationSession;
use std::path::PathBuf;

pub async fn run(
    spec: SpecArgs,
    export: Option<Option<PathBuf>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = spec.record_with_defaults()?;
    let config = load_config_with_key()?;

    let provider = pumpwise_providers::build_chain(&config)?;
    let mut session = ConversationSession::new(provider);

    eprint!("  Generating...");
    let result = session.start_generation(record).await;
    eprint!("\r               \r");

    let solution = result.map_err(|e| format!("Generation failed ({}): {e}", e.kind()))?;

    println!("Suggested Solution:");
    println!();
    println!("{solution}");

    if let Some(path) = export {
        let written = export_solution(&config, &solution, path.as_deref())?;
        eprintln!();
        eprintln!("  Saved to {}", written.display());
    }

    Ok(())
}
