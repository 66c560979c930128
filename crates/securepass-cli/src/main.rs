mod bootstrap;
mod commands;
mod paths;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sp_crypto::generator::GeneratorOptions;
use std::path::PathBuf;

use commands::{EditArgs, PasswordSource};

#[derive(Parser)]
#[command(name = "securepass")]
#[command(about = "Local encrypted password vault", long_about = None)]
struct Cli {
    /// Vault directory (overrides SECUREPASS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new entry
    Add {
        title: String,
        username: String,
        #[arg(short, long)]
        category: Option<String>,
        /// Generate the password instead of prompting
        #[arg(short, long)]
        generate: bool,
        /// Read the password from the first line of stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Edit an existing entry; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        generate: bool,
        #[arg(long)]
        password_stdin: bool,
        /// Prompt for a new password
        #[arg(long, conflicts_with_all = ["generate", "password_stdin"])]
        new_password: bool,
    },

    /// Delete an entry
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List entries, newest first
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show one entry including its decrypted password
    Show { id: i64 },

    /// List distinct categories
    Categories,

    /// Export entries as plaintext CSV
    Export {
        /// Output file [default: passwords_<timestamp>.csv]
        path: Option<PathBuf>,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Entry and category counts
    Stats,

    /// Generate a random password without opening the vault
    Generate {
        #[arg(short, long)]
        length: Option<usize>,
        #[arg(long)]
        no_upper: bool,
        #[arg(long)]
        no_digits: bool,
        #[arg(long)]
        no_special: bool,
    },

    /// Re-run the double-encryption repair pass
    Repair,
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = paths::resolve_data_dir(cli.data_dir)?;
    let settings = settings::load(&data_dir)?;
    init_tracing(&settings.log_filter);

    if let Commands::Generate {
        length,
        no_upper,
        no_digits,
        no_special,
    } = cli.command
    {
        let opts = GeneratorOptions {
            length: length.unwrap_or(settings.generator.length),
            uppercase: settings.generator.uppercase && !no_upper,
            digits: settings.generator.digits && !no_digits,
            special: settings.generator.special && !no_special,
        };
        return commands::generate(&opts);
    }

    let session = bootstrap::unlock(&data_dir).await?;

    match cli.command {
        Commands::Add {
            title,
            username,
            category,
            generate,
            password_stdin,
        } => {
            let source = PasswordSource::from_flags(generate, password_stdin);
            commands::add(&session, &settings, title, username, category, source).await
        }
        Commands::Edit {
            id,
            title,
            username,
            category,
            generate,
            password_stdin,
            new_password,
        } => {
            let password = (generate || password_stdin || new_password)
                .then(|| PasswordSource::from_flags(generate, password_stdin));
            let args = EditArgs {
                id,
                title,
                username,
                category,
                password,
            };
            commands::edit(&session, &settings, args).await
        }
        Commands::Delete { id, yes } => commands::delete(&session, id, yes).await,
        Commands::List { search, category } => commands::list(&session, search, category).await,
        Commands::Show { id } => commands::show(&session, id).await,
        Commands::Categories => commands::categories(&session).await,
        Commands::Export {
            path,
            search,
            category,
        } => commands::export(&session, path, search, category).await,
        Commands::Stats => commands::stats(&session).await,
        Commands::Repair => commands::repair(&session).await,
        Commands::Generate { .. } => Ok(()),
    }
}
