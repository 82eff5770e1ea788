use std::io::Write;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use prompt_review::connector::{tui, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use prompt_review::{ChatController, Commands, Container, ContainerConfig, Router};

/// Log file used while the terminal UI owns the screen.
const UI_LOG_FILE: &str = "prompt-review.log";

#[derive(Parser)]
#[command(name = "prompt-review")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// OpenAI API key (defaults to $OPENAI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// OpenAI-compatible server (defaults to $OPENAI_BASE_URL, then api.openai.com)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request transport timeout
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Answer from a deterministic offline gateway instead of the API
    #[arg(long, global = true)]
    mock: bool,

    /// Query the models of a prompt test concurrently
    #[arg(long, global = true)]
    concurrent: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            api_key: self
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
            base_url: self
                .base_url
                .clone()
                .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: self.timeout_secs,
            mock: self.mock,
            concurrent: self.concurrent,
            show_progress: matches!(self.command, Commands::Test { .. }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, matches!(cli.command, Commands::Ui))?;

    let config = cli.container_config();

    match cli.command {
        Commands::Ui => tui::run(config).await?,
        Commands::Chat { model, reflect } => {
            let container = Container::new(config)?;
            run_chat(&container, model, reflect).await?;
        }
        command => {
            let container = Container::new(config)?;
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, to_file: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false);

    if to_file {
        let path = std::env::temp_dir().join(UI_LOG_FILE);
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let subscriber = builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        info!("Logging to {}", path.display());
    } else {
        let subscriber = builder.with_writer(std::io::stderr).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

async fn run_chat(container: &Container, model: String, reflect: bool) -> Result<()> {
    let controller = ChatController::new(container, model, reflect);
    info!("Chat session {} started", controller.session_id());
    println!(
        "Interactive Chatbot (/model <name> switches model, /reflect on|off, /clear resets the conversation, /quit exits)"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" => break,
            "/clear" => println!("{}", controller.clear().await),
            "/history" => println!("{}", controller.transcript().await),
            "/reflect on" => println!("{}", controller.set_reflection(true).await),
            "/reflect off" => println!("{}", controller.set_reflection(false).await),
            command if command.starts_with("/model") => {
                println!("{}", controller.set_model(&command["/model".len()..]).await)
            }
            _ => println!("{}\n", controller.send(&line).await?),
        }
    }

    Ok(())
}
