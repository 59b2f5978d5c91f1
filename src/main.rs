use async_trait::async_trait;
use log::{error, info, warn};
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tokio::time::interval;
use vote_client::api::HttpVoteApi;
use vote_client::client::state::{SharedView, ViewSnapshot};
use vote_client::credentials::{CredentialProvider, StaticCredential};
use vote_client::models::{Candidate, ToastKind};
use vote_client::storage::{KeyValueStore, MemoryStore, SqliteStore};
use vote_client::voting::{render_results, results_rows};
use vote_client::{ActionOutcome, ClientConfig, VotingClient};

const BAR_WIDTH: usize = 40;

type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

// Reads the admin key from the same stdin the command loop uses
struct StdinPrompt {
    lines: InputLines,
}

#[async_trait]
impl CredentialProvider for StdinPrompt {
    async fn request_credential(&self, prompt: &str) -> Option<String> {
        println!("{}", prompt);
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(e) => {
                error!("Could not read admin key: {}", e);
                None
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let api = match HttpVoteApi::new(&config) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    // Local state; without it the voter id only lasts for this session
    let store: Arc<dyn KeyValueStore> = match SqliteStore::connect(&config.state_url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Local state unavailable ({}), voter id will not persist", e);
            Arc::new(MemoryStore::new())
        }
    };

    let lines: InputLines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let credentials: Arc<dyn CredentialProvider> = match env::var("VOTE_ADMIN_KEY") {
        Ok(key) if !key.is_empty() => Arc::new(StaticCredential(key)),
        _ => Arc::new(StdinPrompt {
            lines: Arc::clone(&lines),
        }),
    };

    info!("Talking to {}", config.base_url);
    let candidates = config.candidates.clone();
    let poll_interval = config.poll_interval;
    let client = VotingClient::new(config, api)
        .with_store(store)
        .with_credentials(credentials);

    client.mount();
    let render = tokio::spawn(render_loop(client.view(), candidates.clone(), poll_interval));

    print_help(&candidates);
    loop {
        let next = {
            let mut lines = lines.lock().await;
            lines.next_line().await
        };
        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Could not read input: {}", e);
                break;
            }
        };

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(&candidates),
            "results" => print_results(&candidates, &client.snapshot().await),
            "reset" => {
                let outcome = client.reset().await;
                report(&client, outcome).await;
            }
            id if client.config().candidate(id).is_some() => {
                let outcome = client.vote(id).await;
                report(&client, outcome).await;
            }
            other => println!("Unknown command or candidate: {}", other),
        }
    }

    client.unmount();
    render.abort();
    info!("Bye");
}

// Redraws whenever the tally or toast changes
async fn render_loop(view: SharedView, candidates: Vec<Candidate>, every: std::time::Duration) {
    let mut ticker = interval(every);
    let mut last_shown = None;

    loop {
        ticker.tick().await;
        let snapshot = view.snapshot().await;
        let key = (
            snapshot.tally.clone(),
            snapshot.toast.as_ref().map(|t| t.text.clone()),
        );
        if last_shown.as_ref() == Some(&key) {
            continue;
        }
        print_results(&candidates, &snapshot);
        last_shown = Some(key);
    }
}

fn print_results(candidates: &[Candidate], snapshot: &ViewSnapshot) {
    let rows = results_rows(candidates, &snapshot.tally);
    println!("\nLive Results\n{}", render_results(&rows, BAR_WIDTH));
    println!("{}", snapshot.status_line());
    if let Some(toast) = &snapshot.toast {
        print_toast(toast.kind, &toast.text);
    }
}

async fn report(client: &VotingClient, outcome: ActionOutcome) {
    match outcome {
        ActionOutcome::Succeeded | ActionOutcome::Failed => {
            if let Some(toast) = client.snapshot().await.toast {
                print_toast(toast.kind, &toast.text);
            }
        }
        ActionOutcome::Busy => println!("Still working on the previous request..."),
        ActionOutcome::Cancelled => println!("Reset cancelled."),
    }
}

fn print_toast(kind: ToastKind, text: &str) {
    match kind {
        ToastKind::Success => println!("✔ {}", text),
        ToastKind::Error => println!("✖ {}", text),
    }
}

fn print_help(candidates: &[Candidate]) {
    println!("Vote for your favorite!");
    for candidate in candidates {
        if candidate.description.is_empty() {
            println!("  {:<8} vote for {}", candidate.id, candidate.name);
        } else {
            println!(
                "  {:<8} vote for {} ({})",
                candidate.id, candidate.name, candidate.description
            );
        }
    }
    println!("  {:<8} reset all votes", "reset");
    println!("  {:<8} show the latest results", "results");
    println!("  {:<8} leave", "quit");
}
