use std::{process::ExitCode, sync::Arc};

use hydrate_tracker::{
    commands::{run_command, Command},
    config::Config,
    logging,
    state::HydrationState,
    storage::{FileStore, KeyValueStore, MemoryStore},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

/// Runs one command and prints its output. Returns `false` on quit.
async fn handle_line<S: KeyValueStore>(state: &mut HydrationState<S>, line: &str) -> bool {
    let command = match line.parse::<Command>() {
        Ok(Command::Quit) => return false,
        Ok(command) => command,
        Err(e) => {
            println!("{e}");
            return true;
        }
    };

    match run_command(state, command).await {
        Ok(output) => println!("{output}"),
        Err(e) => println!("{e}"),
    }
    true
}

async fn interactive<S: KeyValueStore>(state: &mut HydrationState<S>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("{}", hydrate_tracker::commands::render_status(state));
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !handle_line(state, &line).await {
            break;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(&config);

    // Still usable without a writable data directory, nothing gets saved though
    let store: Arc<dyn KeyValueStore> = match FileStore::open(config.data_dir.clone()).await {
        Ok(store) => {
            info!("Keeping data in {:?}", store.data_dir());
            Arc::new(store)
        }
        Err(e) => {
            error!("Unable to open data directory {:?}: {e}", config.data_dir);
            warn!("Falling back to in-memory storage, changes won't be kept");
            Arc::new(MemoryStore::new())
        }
    };

    let mut state = HydrationState::initialize(store).await;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        handle_line(&mut state, &args.join(" ")).await;
        return ExitCode::SUCCESS;
    }

    if let Err(e) = interactive(&mut state).await {
        error!("Terminal I/O failed: {e}");
        return ExitCode::FAILURE;
    }

    info!("Bye");
    ExitCode::SUCCESS
}
