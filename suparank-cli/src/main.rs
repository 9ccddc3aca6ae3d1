mod config;
mod output;
mod parse;
mod prompt;
mod store;

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use suparank_core::{
    ChoiceResponse, Item, Next, RankingService, ResultResponse, StartResponse,
    max_comparisons,
};
use tracing_subscriber::EnvFilter;

use crate::parse::{Answer, parse_answer};
use crate::store::FileStore;

type Service = RankingService<FileStore, FileStore>;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "suparank", version, about = "Rank items by answering pairwise comparisons")]
struct Cli {
    /// Path to config file (default: ~/.config/suparank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding items and sessions (also reads SUPARANK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Show debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a default config file at ~/.config/suparank/config.toml
    Init,
    /// Manage the items available for ranking
    #[command(subcommand)]
    Item(ItemCommand),
    /// Start a ranking session (default: every item)
    Start {
        /// Item ID to include (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Show the pending pair of a session
    Next { session: String },
    /// Answer the pending pair with A or B
    Choose { session: String, choice: String },
    /// Show the final ranking (fails until the session is complete)
    Result { session: String },
    /// Show the current, possibly provisional, ranking
    Rankings { session: String },
    /// Discard every decision of a session and start over
    Reset { session: String },
    /// Delete a session
    Drop { session: String },
    /// List stored sessions
    Sessions,
    /// Answer comparisons interactively until the ranking is complete
    Rank {
        /// Session to continue (default: start a new one over every item)
        session: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ItemCommand {
    /// Add one item
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Add items from a file: JSON array or one title per line
    Import { file: PathBuf },
    /// List all items
    List,
    /// Delete an item
    Rm { id: String },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    if let Commands::Init = cli.command {
        config::create_default_config(&config_path);
        println!("Created config at {}", config_path.display());
        println!("Edit it to set your data directory and output defaults.");
        return;
    }

    let cfg = config::load_config(&config_path);
    let json = cli.json || cfg.json.unwrap_or(false);
    let data_dir = config::resolve_data_dir(
        cli.data_dir.clone(),
        std::env::var(config::DATA_DIR_ENV).ok(),
        &cfg,
    );
    let store = FileStore::open(&data_dir).unwrap_or_else(|e| bail(e));
    tracing::debug!(data_dir = %store.root().display(), "opened store");
    let mut service = RankingService::new(store.clone(), store);

    if let Err(e) = run(cli.command, &mut service, json) {
        bail(e);
    }
}

fn run(command: Commands, service: &mut Service, json: bool) -> suparank_core::Result<()> {
    match command {
        Commands::Init => {}
        Commands::Item(cmd) => run_item(cmd, service, json)?,
        Commands::Start { items } => {
            let session_id = if items.is_empty() {
                service.start_session_all()?
            } else {
                service.start_session(&items)?
            };
            if json {
                output::print_json(&StartResponse { session_id });
            } else {
                println!("{session_id}");
            }
        }
        Commands::Next { session } => {
            let next = service.next(&session)?;
            if json {
                output::print_next_json(next);
            } else {
                output::print_next(&next);
            }
        }
        Commands::Choose { session, choice } => {
            let choice = choice.parse()?;
            let next = service.choose(&session, choice)?;
            if json {
                output::print_json(&ChoiceResponse::accepted(next));
            } else {
                println!("Recorded {choice}.");
                output::print_next(&next);
            }
        }
        Commands::Result { session } => {
            let sorted = service.result(&session)?;
            if json {
                output::print_json(&ResultResponse { sorted_list: sorted });
            } else {
                output::print_table(&sorted);
            }
        }
        Commands::Rankings { session } => {
            let rankings = service.rankings(&session)?;
            if json {
                output::print_rankings_json(&rankings);
            } else {
                output::print_rankings(&rankings);
            }
        }
        Commands::Reset { session } => {
            service.reset(&session)?;
            println!("Session {session} reset.");
        }
        Commands::Drop { session } => {
            service.drop_session(&session)?;
            println!("Session {session} deleted.");
        }
        Commands::Sessions => {
            let ids = service.sessions().session_ids()?;
            if json {
                output::print_json(&ids);
            } else {
                for id in ids {
                    println!("{id}");
                }
            }
        }
        Commands::Rank { session } => {
            let session_id = match session {
                Some(id) => id,
                None => {
                    let id = service.start_session_all()?;
                    eprintln!("Started session {id}");
                    id
                }
            };
            run_interactive(service, &session_id)?;
        }
    }
    Ok(())
}

fn run_item(cmd: ItemCommand, service: &mut Service, json: bool) -> suparank_core::Result<()> {
    match cmd {
        ItemCommand::Add { title, description } => {
            if title.trim().is_empty() {
                bail("--title must not be empty");
            }
            let item = service.add_item(title.trim(), description.trim())?;
            if json {
                output::print_json(&item);
            } else {
                println!("{}", item.id);
            }
        }
        ItemCommand::Import { file } => {
            let content = std::fs::read_to_string(&file).unwrap_or_else(|e| {
                bail(format!("Failed to read items file {}: {e}", file.display()))
            });
            let imported = parse::parse_items_from_str(&content).unwrap_or_else(|e| bail(e));
            let mut created: Vec<Item> = Vec::with_capacity(imported.len());
            for entry in imported {
                created.push(service.add_item(&entry.title, &entry.description)?);
            }
            if json {
                output::print_json(&created);
            } else {
                println!("Imported {} items", created.len());
            }
        }
        ItemCommand::List => {
            let items = service.list_items()?;
            if json {
                output::print_json(&items);
            } else {
                output::print_table(&items);
            }
        }
        ItemCommand::Rm { id } => {
            service.delete_item(&id)?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

/// Present pairs on stdout and read answers from stdin until the ranking
/// completes or the user quits. Progress is saved after every answer.
fn run_interactive(service: &mut Service, session_id: &str) -> suparank_core::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let total: usize = service.rankings(session_id)?.items.len();
    let most = max_comparisons(total);

    let mut next = service.next(session_id)?;
    loop {
        let (item_a, item_b) = match &next {
            Next::Done { sorted } => {
                println!("\nAll entries have been ranked!\n");
                output::print_table(sorted);
                return Ok(());
            }
            Next::Compare { item_a, item_b } => (item_a, item_b),
        };

        let done = service.rankings(session_id)?.comparisons;
        print!("{}> ", prompt::build_prompt(item_a, item_b, done, most));
        io::stdout().flush().unwrap_or_else(|e| bail(format!("Failed to write to stdout: {e}")));

        let Some(line) = lines.next() else {
            println!();
            print_resume_hint(session_id);
            return Ok(());
        };
        let line = line.unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")));

        match parse_answer(&line) {
            Answer::Pick(choice) => next = service.choose(session_id, choice)?,
            Answer::ViewRankings => {
                println!();
                output::print_rankings(&service.rankings(session_id)?);
            }
            Answer::Quit => {
                print_resume_hint(session_id);
                return Ok(());
            }
            Answer::Unknown => eprintln!("Please answer a or b (v to view rankings, q to quit)."),
        }
    }
}

fn print_resume_hint(session_id: &str) {
    println!("Progress saved. Resume with: suparank rank {session_id}");
}
