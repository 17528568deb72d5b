//! A terminal chat front-end built on the `parley` library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use parley::core::{Role, Submission, Turn};
use parley::{Error, SessionBuilder};
use parley_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use tokio::io::{self, AsyncBufReadExt};
use tokio::time::timeout;

const BAR_CHAR: &str = "▎";

enum Command<'a> {
    Quit,
    History,
    Upload(&'a str),
    Message(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "/quit" | "/exit" => Command::Quit,
            "/history" => Command::History,
            _ => match line.strip_prefix("/upload") {
                Some(path) if path.is_empty() || path.starts_with(' ') => {
                    Command::Upload(path.trim())
                }
                _ => Command::Message(line),
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("GROQ_API_KEY") else {
        eprintln!("GROQ_API_KEY environment variable is not set");
        return ExitCode::FAILURE;
    };
    let mut config_builder = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(model) = env::var("PARLEY_MODEL") {
        config_builder = config_builder.with_model(model);
    }
    if let Ok(base_url) = env::var("PARLEY_BASE_URL") {
        config_builder = config_builder.with_base_url(base_url);
    }
    let config = config_builder.build();
    debug!("using {config:?}");

    let request_timeout = env::var("PARLEY_TIMEOUT_SECS")
        .ok()
        .and_then(|secs| secs.parse().ok())
        .map(Duration::from_secs);

    let provider = OpenAIProvider::new(config);
    let session = SessionBuilder::with_model_provider(provider)
        .with_system_prompt(include_str!("./system_prompt.md"))
        .build();
    let mut session = match session {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", "Legal Chatbot".bold());
    println!(
        "{}",
        "Type /upload <file> to share a document, /quit to leave.".dimmed()
    );
    println!();
    for turn in session.transcript() {
        print_turn(turn);
    }

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line().await else {
            break;
        };

        let result = match Command::parse(&line) {
            Command::Quit => break,
            Command::History => {
                for turn in session.transcript() {
                    print_turn(turn);
                }
                continue;
            }
            Command::Upload("") => {
                print_error("usage: /upload <file>");
                continue;
            }
            Command::Upload(path) => {
                let fut = session.upload_file(path);
                let result = run_with_spinner(fut, request_timeout).await;
                if matches!(result, Some(Ok(Submission::Replied(_)))) {
                    println!(
                        "{}📄 Sent {}",
                        BAR_CHAR.bright_blue(),
                        Path::new(path).display()
                    );
                }
                result
            }
            Command::Message(text) => {
                let fut = session.send_message(text);
                run_with_spinner(fut, request_timeout).await
            }
        };

        match result {
            Some(Ok(Submission::Replied(_))) => {
                if let Some(turn) = session.transcript().last() {
                    print_turn(turn);
                }
            }
            // Blank input is dropped without feedback.
            Some(Ok(Submission::Ignored)) => {}
            Some(Err(err)) => report_error(&err),
            None => print_error(
                "The assistant took too long to answer. \
                 Send your message again to retry.",
            ),
        }
    }

    ExitCode::SUCCESS
}

/// Shows a spinner while `fut` is running. Returns `None` if `limit` elapses
/// first.
async fn run_with_spinner<F: Future>(
    fut: F,
    limit: Option<Duration>,
) -> Option<F::Output> {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style);
    progress_bar.set_message("🤔 AI is thinking...");
    progress_bar.enable_steady_tick(Duration::from_millis(100));

    let output = match limit {
        Some(limit) => timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    };

    // Finish the progress bar before printing anything else.
    progress_bar.finish_and_clear();
    output
}

fn print_turn(turn: &Turn) {
    match turn.role() {
        Role::System => {}
        Role::User => {
            println!("{}You: {}", BAR_CHAR.bright_green(), turn.content());
        }
        Role::Assistant => {
            println!(
                "{}AI: {}",
                BAR_CHAR.bright_cyan(),
                turn.content().bright_white()
            );
        }
    }
}

fn report_error(err: &Error) {
    warn!("submission failed: {err:?}");
    match err {
        Error::Conversation(parley::core::ControllerError::Completion(_)) => {
            print_error(&format!(
                "Error communicating with the completion service: {err}"
            ));
        }
        _ => print_error(&err.to_string()),
    }
}

fn print_error(message: &str) {
    println!("{}⚠️  {}", BAR_CHAR.bright_red(), message.red());
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
