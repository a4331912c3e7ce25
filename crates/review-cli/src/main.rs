//! doccloud-review: terminal front end for the sensitive-document review queue.

mod args;
mod terminal;

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use doccloud::{DocumentCloudClient, LoginPrompt, ReviewSummary, ReviewWorkflow};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{Cli, Command};
use crate::terminal::TerminalReviewer;

/// Logs go to stderr so they never interleave with prompts on stdout.
///
/// `RUST_LOG` takes precedence. Otherwise `DOCCLOUD_LOG` picks the level for
/// this workspace's crates, and `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = log_level(std::env::var("DOCCLOUD_LOG").ok().as_deref());
        EnvFilter::new(format!("doccloud={level},doccloud_review={level}"))
    };

    let use_json = std::env::var("LOG_FORMAT").as_deref() == Ok("json");

    if use_json {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    }
}

fn log_level(value: Option<&str>) -> &'static str {
    match value {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") | Some("warning") => "warn",
        Some("error") => "error",
        _ => "warn",
    }
}

/// Build the client, trading a session cookie for an API key when no key was given.
async fn connect(cli: &Cli) -> anyhow::Result<DocumentCloudClient> {
    let client =
        DocumentCloudClient::new(cli.client_config()).context("invalid client configuration")?;

    if client.has_api_key() || cli.session_cookie.is_none() {
        return Ok(client);
    }

    info!("No API key given, deriving one from the session");
    client
        .authenticated()
        .await
        .context("failed to derive an API key from the session cookie")
}

/// Username of the session user; fails when nobody is logged in.
async fn require_login(workflow: &ReviewWorkflow) -> anyhow::Result<String> {
    match workflow.login_prompt().await? {
        LoginPrompt::LoggedIn { username } => Ok(username),
        LoginPrompt::LoggedOut {
            login_url,
            signup_url,
        } => bail!(
            "failed to authenticate: log in at {login_url} or create an account at {signup_url}"
        ),
    }
}

fn describe(summary: &ReviewSummary) -> String {
    let ending = if summary.exhausted {
        "No unreviewed documents left."
    } else {
        "Review stopped."
    };
    format!(
        "{ending} Sensitive: {}, non-sensitive: {}, skipped: {}.",
        summary.sensitive, summary.non_sensitive, summary.skipped
    )
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = connect(&cli).await?;
    let workflow = ReviewWorkflow::new(client, cli.projects());

    match cli.command() {
        Command::Whoami => {
            println!("{}", workflow.login_prompt().await?);
        }
        Command::Counts => {
            println!("{}", workflow.counts().await?);
        }
        Command::Next => match workflow.next_unreviewed().await? {
            Some(candidate) => {
                let item = workflow.prepare(candidate).await?;
                println!("Document {}: {}", item.document, item.embed_url);
                for note in &item.notes {
                    println!("  {note}");
                }
            }
            None => println!("No unreviewed documents left."),
        },
        Command::Review => {
            let username = require_login(&workflow).await?;
            println!("Logged in as {username}.");
            let reviewer = TerminalReviewer::stdio();
            let summary = workflow
                .run(&reviewer)
                .await
                .context("review interrupted")?;
            println!("{}", describe(&summary));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "doccloud-review failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccloud::{ClientConfig, ReviewProjects};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn workflow_for(server: &MockServer) -> ReviewWorkflow {
        let client = DocumentCloudClient::new(
            ClientConfig::new()
                .with_api_base_url(server.uri())
                .with_auth_base_url("https://accounts.example")
                .with_requests_per_second(1000),
        )
        .unwrap();
        ReviewWorkflow::new(client, ReviewProjects::default())
    }

    #[tokio::test]
    async fn review_refuses_to_start_when_logged_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me/"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let err = require_login(&workflow_for(&server)).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to authenticate"));
        assert!(message.contains("https://accounts.example/accounts/login/"));
    }

    #[tokio::test]
    async fn review_starts_for_logged_in_user() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 1, "username": "reviewer"})),
            )
            .mount(&server)
            .await;

        let username = require_login(&workflow_for(&server)).await.unwrap();
        assert_eq!(username, "reviewer");
    }

    #[test]
    fn log_level_accepts_warning_alias() {
        assert_eq!(log_level(Some("warning")), "warn");
        assert_eq!(log_level(Some("warn")), "warn");
        assert_eq!(log_level(Some("debug")), "debug");
        assert_eq!(log_level(Some("loud")), "warn");
        assert_eq!(log_level(None), "warn");
    }

    #[test]
    fn summary_text_distinguishes_quit_from_exhausted() {
        let mut summary = ReviewSummary {
            sensitive: 2,
            non_sensitive: 1,
            skipped: 3,
            exhausted: true,
        };
        assert_eq!(
            describe(&summary),
            "No unreviewed documents left. Sensitive: 2, non-sensitive: 1, skipped: 3."
        );

        summary.exhausted = false;
        assert!(describe(&summary).starts_with("Review stopped."));
    }
}
