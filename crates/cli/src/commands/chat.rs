//! `pumpwise chat`: Interactive chat about the current specification.
//!
//! In-chat commands:
//! - `exit` / `quit`   end the session
//! - `/history`        print the transcript
//! - `/export [PATH]`  save the last suggested solution
//! - `/spec FILE`      load a new specification and generate again

use super::export::export_solution;
use super::load_config_with_key;
use super::spec_input::{SpecArgs, load_spec_file};
use pumpwise_config::AppConfig;
use pumpwise_core::message::{Message, Role};
use pumpwise_core::spec::SpecificationRecord;
use pumpwise_session::ConversationSession;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of chat input, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput<'a> {
    Exit,
    History,
    Export(Option<&'a str>),
    Spec(Option<&'a str>),
    Message(&'a str),
}

/// The argument of `/name ARG`, or `None` when `trimmed` is another input.
fn command_arg<'a>(trimmed: &'a str, name: &str) -> Option<Option<&'a str>> {
    let rest = trimmed.strip_prefix(name)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let arg = rest.trim();
    Some((!arg.is_empty()).then_some(arg))
}

impl<'a> ChatInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "exit" | "quit" => ChatInput::Exit,
            "/history" => ChatInput::History,
            _ => {
                if let Some(path) = command_arg(trimmed, "/export") {
                    ChatInput::Export(path)
                } else if let Some(path) = command_arg(trimmed, "/spec") {
                    ChatInput::Spec(path)
                } else {
                    ChatInput::Message(line)
                }
            }
        }
    }
}

fn print_reply(content: &str) {
    println!();
    for line in content.lines() {
        println!("  Assistant > {line}");
    }
    println!();
}

fn print_history(history: &[Message]) {
    if history.is_empty() {
        println!("  (no messages yet)");
        return;
    }
    for msg in history {
        let who = match msg.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
            Role::System => "System",
        };
        for line in msg.content.lines() {
            println!("  [{}] {who} > {line}", msg.seq);
        }
    }
}

fn export_last(config: &AppConfig, solution: Option<&str>, path: Option<&str>) {
    let Some(solution) = solution else {
        eprintln!("  [Error] No suggested solution yet. Load one with /spec FILE.");
        return;
    };
    match export_solution(config, solution, path.map(Path::new)) {
        Ok(written) => println!("  Saved to {}", written.display()),
        Err(e) => eprintln!("  [Error] Export failed: {e}"),
    }
}

/// Generate for `record`, replacing the session's record and the last
/// solution on success. A failure keeps both.
async fn generate(
    session: &mut ConversationSession,
    record: SpecificationRecord,
    last_solution: &mut Option<String>,
) {
    eprint!("  Generating...");
    let result = session.start_generation(record).await;
    eprint!("\r               \r");
    match result {
        Ok(solution) => {
            println!("  Suggested Solution:");
            print_reply(&solution);
            *last_solution = Some(solution);
        }
        Err(e) => {
            eprintln!("  [Error] {e}");
            println!();
        }
    }
}

pub async fn run(spec: SpecArgs) -> Result<(), Box<dyn std::error::Error>> {
    let record = spec.record()?;
    let config = load_config_with_key()?;

    let provider = pumpwise_providers::build_chain(&config)?;
    let mut session = ConversationSession::new(provider);
    let mut last_solution: Option<String> = None;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Pumpwise — Pump Selection Chat        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.model_for(&config.default_provider));
    println!();

    if let Some(record) = record {
        generate(&mut session, record, &mut last_solution).await;
    } else {
        println!("  No specification given; chatting without pump data.");
        println!();
    }

    println!("  Type your message and press Enter.");
    println!("  Commands: /history, /export [PATH], /spec FILE, exit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ChatInput::parse(&line) {
            ChatInput::Exit => break,
            ChatInput::History => print_history(&session.history()),
            ChatInput::Export(path) => export_last(&config, last_solution.as_deref(), path),
            ChatInput::Spec(None) => eprintln!("  [Error] Usage: /spec FILE (TOML or JSON)"),
            ChatInput::Spec(Some(path)) => match load_spec_file(Path::new(path)) {
                Ok(record) => generate(&mut session, record, &mut last_solution).await,
                Err(e) => eprintln!("  [Error] {e}"),
            },
            ChatInput::Message(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                eprint!("  ...");
                let result = session.post_user_message(text).await;
                eprint!("\r     \r");
                match result {
                    Ok(reply) => print_reply(&reply.content),
                    Err(e) => {
                        eprintln!("  [Error] {e}");
                        println!();
                    }
                }
            }
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
