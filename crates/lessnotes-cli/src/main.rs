//! Lessnotes CLI - ask questions about your own notes.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Lessnotes - personal notes question-answering assistant
#[derive(Parser)]
#[command(name = "lessnotes")]
#[command(author = "Lalo Morales <lalomorales22@github.com>")]
#[command(version)]
#[command(about = "Ask questions about your own notes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize lessnotes (create config and database)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show initialization and Ollama status
    Status,

    /// Manage users
    #[command(subcommand)]
    User(UserCommands),

    /// Manage conversations
    #[command(subcommand)]
    Conversation(ConversationCommands),

    /// Reconcile and index a user's note files
    Process {
        /// User id
        user: i64,

        /// Directory to scan instead of the user's default note tree
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List a user's tracked files
    Files {
        /// User id
        user: i64,
    },

    /// Ask a question about your notes
    Ask {
        /// The question
        prompt: String,

        /// User id
        #[arg(short, long)]
        user: i64,

        /// Conversation id for chat history
        #[arg(short, long)]
        conversation: i64,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config file in editor
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., ollama.model)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a new user and create their note directory
    Add {
        /// Username
        username: String,

        /// Email address
        email: String,

        /// Display name used in prompts
        #[arg(short, long)]
        name: Option<String>,

        /// School used in prompts
        #[arg(short, long)]
        school: Option<String>,

        /// Major used in prompts
        #[arg(short, long)]
        major: Option<String>,
    },

    /// Show a user's details
    Show {
        /// User id
        id: i64,
    },
}

#[derive(Subcommand)]
enum ConversationCommands {
    /// Start a new conversation for a user
    New {
        /// User id
        user: i64,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("lessnotes=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("lessnotes=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Edit => commands::config::edit(),
            ConfigCommands::Set { key, value } => commands::config::set(&key, &value),
        },
        Commands::Status => commands::status::run(),
        Commands::User(cmd) => match cmd {
            UserCommands::Add {
                username,
                email,
                name,
                school,
                major,
            } => commands::user::add(&username, &email, name, school, major),
            UserCommands::Show { id } => commands::user::show(id),
        },
        Commands::Conversation(cmd) => match cmd {
            ConversationCommands::New { user } => commands::conversation::new(user),
        },
        Commands::Process { user, path } => commands::process::run(user, path),
        Commands::Files { user } => commands::files::run(user),
        Commands::Ask {
            prompt,
            user,
            conversation,
        } => commands::ask::run(&prompt, user, conversation),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
