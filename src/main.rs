use clap::{Parser, Subcommand};
use domain::ai::features::{self, InboxAnalysis};
use domain::ai::prompts::WritingKind;
use domain::ai::settings::{DbSettingsSource, SettingsSource};
use domain::ai::Router;
use domain::ai_key;
use domain::ai_provider::AiProvider;
use domain::error::Error;
use domain::Id;
use log::*;
use migration::{Migrator, MigratorTrait};
use serde_json::{json, Value};
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-provider AI request router", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply all pending database migrations
    Migrate,
    /// Manage stored provider API keys
    Keys {
        #[command(subcommand)]
        action: KeysCommand,
    },
    /// Show or change the provider requests are routed to
    Provider {
        #[command(subcommand)]
        action: ProviderCommand,
    },
    /// Draft content with the writing assistant
    Write {
        topic: String,
        #[arg(long, default_value = "professional")]
        tone: String,
        /// blog, excerpt, project_description or project_detail
        #[arg(long = "type", default_value = "blog")]
        kind: String,
    },
    /// Summarize and classify an inbox message
    Inbox {
        message: String,
        #[arg(long, default_value = "")]
        sender: String,
    },
    /// Ask the admin copilot a question
    Chat {
        query: String,
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Review content for SEO
    Seo {
        content: String,
        #[arg(long, default_value = "")]
        keyword: String,
    },
}

#[derive(Debug, Subcommand)]
enum KeysCommand {
    /// List keys, newest first, with masked secrets
    List {
        #[arg(long)]
        provider: Option<AiProvider>,
    },
    /// Store a new key
    Add {
        provider: AiProvider,
        #[arg(env = "AI_KEY", hide_env_values = true)]
        key: String,
    },
    Delete {
        id: Id,
    },
    Enable {
        id: Id,
    },
    Disable {
        id: Id,
    },
    /// Reset a key's error count to zero
    Reset {
        id: Id,
    },
    /// Send a test prompt with one key
    Verify {
        id: Id,
    },
}

#[derive(Debug, Subcommand)]
enum ProviderCommand {
    Show,
    Set { provider: AiProvider },
}

#[tokio::main]
async fn main() {
    Config::load_env();
    let cli = Cli::parse();

    if let Err(e) = Logger::init_logger(&cli.config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!("Connecting to database [{}]...", cli.config.database_url());

    let db = match service::init_database(&cli.config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(cli.config, &db);

    if let Command::Migrate = cli.command {
        let migrated = match service::ensure_schema(app_state.db_conn_ref()).await {
            Ok(()) => Migrator::up(app_state.db_conn_ref(), None).await,
            Err(e) => Err(e),
        };
        match migrated {
            Ok(()) => info!("Database migrations applied"),
            Err(e) => {
                error!("Failed to apply migrations: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    match run(cli.command, &app_state).await {
        Ok(output) => println!("{output:#}"),
        Err(e) => {
            error!("{e}");
            println!("{:#}", json!({ "error": e.user_message() }));
            std::process::exit(1);
        }
    }
}

async fn run(command: Command, app_state: &AppState) -> Result<Value, Error> {
    match command {
        Command::Migrate => Ok(Value::Null),
        Command::Provider { action } => {
            let settings = DbSettingsSource::new(app_state.db_conn());
            let provider = match action {
                ProviderCommand::Show => settings.active_provider().await,
                ProviderCommand::Set { provider } => settings.set_active_provider(provider).await?,
            };
            Ok(json!({ "ai_provider": provider }))
        }
        Command::Keys { action } => {
            let router = Router::from_state(app_state)?;
            run_keys(action, &router).await
        }
        Command::Write { topic, tone, kind } => {
            let router = Router::from_state(app_state)?;
            let content = features::writing_assistant(
                &router,
                &topic,
                &tone,
                WritingKind::from_name(&kind),
            )
            .await?;
            Ok(json!({ "content": content }))
        }
        Command::Inbox { message, sender } => {
            let router = Router::from_state(app_state)?;
            let analysis: InboxAnalysis =
                features::analyze_inbox_message(&router, &message, &sender).await?;
            Ok(json!(analysis))
        }
        Command::Chat { query, context } => {
            let router = Router::from_state(app_state)?;
            let response = features::copilot(&router, &query, &context).await?;
            Ok(json!({ "response": response }))
        }
        Command::Seo { content, keyword } => {
            let router = Router::from_state(app_state)?;
            let report = features::optimize_seo(&router, &content, &keyword).await?;
            Ok(json!(report))
        }
    }
}

async fn run_keys(action: KeysCommand, router: &Router) -> Result<Value, Error> {
    let executor = router.executor();
    let (store, codec) = (executor.store(), executor.codec());

    match action {
        KeysCommand::List { provider } => {
            Ok(json!(ai_key::list_masked(store, codec, provider).await?))
        }
        KeysCommand::Add { provider, key } => {
            let added = ai_key::add(store, codec, provider, &key).await?;
            Ok(json!({ "message": "Key added successfully", "success": true, "key": added }))
        }
        KeysCommand::Delete { id } => {
            ai_key::delete(store, id).await?;
            Ok(json!({ "message": "Key deleted successfully" }))
        }
        KeysCommand::Enable { id } => Ok(json!(ai_key::set_active(store, codec, id, true).await?)),
        KeysCommand::Disable { id } => {
            Ok(json!(ai_key::set_active(store, codec, id, false).await?))
        }
        KeysCommand::Reset { id } => Ok(json!(ai_key::reset_error_count(store, codec, id).await?)),
        KeysCommand::Verify { id } => Ok(json!(
            ai_key::verify(store, codec, executor.adapters(), id).await?
        )),
    }
}
