//! Command handlers. Each one takes the unlocked session by reference and
//! prints its result to stdout.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use sp_crypto::generator::{self, GeneratorOptions};
use sp_crypto::is_decryption_error;
use sp_store::{EntryDraft, StoreError, VaultEntry};
use std::io::BufRead;
use std::path::PathBuf;
use zeroize::Zeroizing;

use crate::bootstrap::Session;
use crate::settings::CliSettings;

/// Where a new entry password comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    Prompt,
    Stdin,
    Generate,
}

impl PasswordSource {
    pub fn from_flags(generate: bool, password_stdin: bool) -> Self {
        if generate {
            PasswordSource::Generate
        } else if password_stdin {
            PasswordSource::Stdin
        } else {
            PasswordSource::Prompt
        }
    }
}

fn read_password(source: PasswordSource, settings: &CliSettings) -> Result<Zeroizing<String>> {
    match source {
        PasswordSource::Generate => Ok(generator::generate(&settings.generator)?),
        PasswordSource::Stdin => {
            let mut line = Zeroizing::new(String::new());
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("read password from stdin")?;
            let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
            Ok(Zeroizing::new(trimmed))
        }
        PasswordSource::Prompt => Ok(Zeroizing::new(
            rpassword::prompt_password("Entry password: ")
                .map_err(|e| anyhow!("password prompt: {e}"))?,
        )),
    }
}

fn describe(err: StoreError) -> anyhow::Error {
    match err {
        StoreError::NotFound(id) => anyhow!("no entry with id {id}"),
        StoreError::Validation(msg) => anyhow!("invalid entry: {msg}"),
        other => anyhow!("could not read/write vault storage: {other}"),
    }
}

async fn require_entry(session: &Session, id: i64) -> Result<VaultEntry> {
    session
        .store
        .get_by_id(id)
        .await
        .map_err(describe)?
        .ok_or_else(|| describe(StoreError::NotFound(id)))
}

/// Entries narrowed by an optional exact category and an optional search text.
async fn select_entries(
    session: &Session,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<Vec<VaultEntry>> {
    let store = &session.store;
    let entries = match category {
        Some(category) => {
            let in_category = store.filter_by_category(category).await.map_err(describe)?;
            match search.filter(|s| !s.trim().is_empty()) {
                Some(text) => {
                    let needle = text.to_lowercase();
                    in_category.into_iter().filter(|e| e.matches(&needle)).collect()
                }
                None => in_category,
            }
        }
        None => store.search(search.unwrap_or("")).await.map_err(describe)?,
    };
    Ok(entries)
}

pub async fn add(
    session: &Session,
    settings: &CliSettings,
    title: String,
    username: String,
    category: Option<String>,
    source: PasswordSource,
) -> Result<()> {
    let draft = EntryDraft {
        title,
        username,
        password: read_password(source, settings)?,
        category: category.unwrap_or_else(|| settings.default_category.clone()),
    };
    let sealed = draft.seal(session.store.cipher()).map_err(describe)?;
    let entry = session.store.add(sealed).await.map_err(describe)?;
    println!("Added entry {} ({})", entry.id, entry.title);
    if source == PasswordSource::Generate {
        println!("Generated password: {}", draft.password.as_str());
    }
    Ok(())
}

pub struct EditArgs {
    pub id: i64,
    pub title: Option<String>,
    pub username: Option<String>,
    pub category: Option<String>,
    /// `None` keeps the current secret.
    pub password: Option<PasswordSource>,
}

pub async fn edit(session: &Session, settings: &CliSettings, args: EditArgs) -> Result<()> {
    let existing = require_entry(session, args.id).await?;

    let password = match args.password {
        Some(source) => read_password(source, settings)?,
        None => {
            let current = session.store.reveal(&existing);
            if is_decryption_error(&current) {
                bail!("could not decrypt the current password of entry {}; supply a new one", args.id);
            }
            current
        }
    };

    let draft = EntryDraft {
        title: args.title.unwrap_or_else(|| existing.title.clone()),
        username: args.username.unwrap_or_else(|| existing.username.clone()),
        password,
        category: args.category.unwrap_or_else(|| existing.category.clone()),
    };
    let updated = draft
        .seal_over(&existing, session.store.cipher())
        .map_err(describe)?;
    session.store.update(&updated).await.map_err(describe)?;
    println!("Updated: {}", updated.title);
    Ok(())
}

pub async fn delete(session: &Session, id: i64, assume_yes: bool) -> Result<()> {
    let Some(entry) = session.store.get_by_id(id).await.map_err(describe)? else {
        println!("No entry with id {id}; nothing deleted");
        return Ok(());
    };
    if !assume_yes && !confirm(&format!("Delete '{}'? This action cannot be undone. [y/N] ", entry.title))? {
        println!("Cancelled");
        return Ok(());
    }
    session.store.delete(id).await.map_err(describe)?;
    println!("Deleted: {}", entry.title);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question}");
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub async fn list(session: &Session, search: Option<String>, category: Option<String>) -> Result<()> {
    let entries = select_entries(session, search.as_deref(), category.as_deref()).await?;
    for e in &entries {
        println!(
            "{:>5}  {:<24}  {:<28}  {:<12}  {}",
            e.id,
            e.title,
            e.username,
            e.category,
            e.created_at.with_timezone(&Local).format("%d.%m.%Y %H:%M")
        );
    }
    println!("Loaded: {} records", entries.len());
    Ok(())
}

pub async fn show(session: &Session, id: i64) -> Result<()> {
    let entry = require_entry(session, id).await?;
    let password = session.store.reveal(&entry);
    println!("Title: {}", entry.title);
    println!("Username: {}", entry.username);
    println!("Password: {}", password.as_str());
    println!("Category: {}", entry.category);
    println!(
        "Created: {}",
        entry.created_at.with_timezone(&Local).format("%d.%m.%Y %H:%M")
    );
    Ok(())
}

pub async fn categories(session: &Session) -> Result<()> {
    for category in session.store.list_categories().await.map_err(describe)? {
        println!("{category}");
    }
    Ok(())
}

pub async fn export(
    session: &Session,
    path: Option<PathBuf>,
    search: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let entries = select_entries(session, search.as_deref(), category.as_deref()).await?;
    let path = path.unwrap_or_else(|| {
        PathBuf::from(format!("passwords_{}.csv", Local::now().format("%Y%m%d_%H%M%S")))
    });
    let rows = session.store.export(&entries, &path).await.map_err(describe)?;
    println!("Exported {rows} entries to {}", path.display());
    eprintln!("Warning: the export contains plaintext passwords.");
    Ok(())
}

pub async fn stats(session: &Session) -> Result<()> {
    let stats = session.store.stats().await.map_err(describe)?;
    println!("Entries: {}", stats.entries);
    println!("Categories: {}", stats.categories);
    Ok(())
}

pub async fn repair(session: &Session) -> Result<()> {
    let report = session
        .store
        .repair_double_encrypted()
        .await
        .map_err(describe)?;
    println!(
        "Examined {} entries, repaired {}",
        report.examined,
        report.repaired.len()
    );
    for id in &report.repaired {
        println!("  repaired entry {id}");
    }
    Ok(())
}

pub fn generate(opts: &GeneratorOptions) -> Result<()> {
    let password = generator::generate(opts)?;
    println!("{}", password.as_str());
    Ok(())
}
