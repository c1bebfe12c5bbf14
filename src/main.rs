//! Command line interface for composing notes and inspecting their inline
//! mentions and hashtags.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use nostr_blocks::{
    config::Settings, parse_mentions, post_to_event, render_blocks, Block, Note, Post,
    ReferencedId, Tag,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command line interface entry point.
#[derive(Parser)]
#[command(
    name = "nblocks",
    author,
    version,
    about = "Compose and parse Nostr note mentions"
)]
struct Cli {
    /// Path to the `.env` configuration file.
    #[arg(long, default_value = ".env")]
    env: String,
    /// Log resolution details to stderr.
    #[arg(long)]
    verbose: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write a default `.env` if none exists.
    Init,
    /// Compose a draft into an unsigned event (JSON on stdout).
    Compose {
        /// Draft text, or `-` to read it from stdin.
        text: String,
        /// Extra reference added to the tag table, as `key:id[:relay]`.
        #[arg(long = "ref", value_name = "KEY:ID")]
        refs: Vec<ReferencedId>,
        /// JSON file with the starting tag table.
        #[arg(long)]
        tags: Option<PathBuf>,
        /// Author public key; overrides `PUBKEY`.
        #[arg(long)]
        pubkey: Option<String>,
        /// Event kind; overrides `KIND`.
        #[arg(long)]
        kind: Option<u32>,
        /// Creation timestamp; defaults to now.
        #[arg(long)]
        created_at: Option<u64>,
    },
    /// Print the content blocks of one or more event files.
    Parse {
        /// Paths to JSON event files.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Render a JSON block list back into note content.
    Render {
        /// Path to a JSON array of blocks.
        file: String,
    },
}

/// Execute the selected CLI subcommand and return what should be printed.
fn run(cli: Cli) -> anyhow::Result<String> {
    ensure_env_file(&cli.env)?;
    let cfg = Settings::from_env(&cli.env)?;
    match cli.command {
        Commands::Init => {
            info!(env = %cli.env, "configuration ready");
            Ok(String::new())
        }
        Commands::Compose {
            text,
            refs,
            tags,
            pubkey,
            kind,
            created_at,
        } => {
            let content = if text == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                text
            };
            let Some(pubkey) = pubkey.or(cfg.pubkey.clone()) else {
                bail!("no author pubkey: set PUBKEY in {} or pass --pubkey", cli.env);
            };
            let start_tags: Vec<Tag> = match tags {
                Some(path) => {
                    let data = fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str(&data)
                        .with_context(|| format!("parsing tags in {}", path.display()))?
                }
                None => Vec::new(),
            };
            let mut references = cfg.default_refs.clone();
            references.extend(refs);
            let post = Post {
                content,
                references,
                tags: start_tags,
                kind: kind.unwrap_or(cfg.kind),
            };
            let created_at = match created_at {
                Some(ts) => ts,
                None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
            };
            let ev = post_to_event(&post, &pubkey, created_at);
            debug!(tags = ev.tags.len(), "composed note");
            Ok(serde_json::to_string_pretty(&ev)?)
        }
        Commands::Parse { files } => {
            // One JSON line of blocks per input file.
            let mut out = Vec::with_capacity(files.len());
            for f in files {
                let data = fs::read_to_string(&f).with_context(|| format!("reading {f}"))?;
                let note: Note =
                    serde_json::from_str(&data).with_context(|| format!("parsing event {f}"))?;
                let blocks = parse_mentions(&note.content, &note.tags);
                debug!(file = %f, id = ?note.id, blocks = blocks.len(), "parsed note");
                out.push(serde_json::to_string(&blocks)?);
            }
            Ok(out.join("\n"))
        }
        Commands::Render { file } => {
            let data = fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
            let blocks: Vec<Block> =
                serde_json::from_str(&data).with_context(|| format!("parsing blocks in {file}"))?;
            Ok(render_blocks(&blocks))
        }
    }
}

/// Create a default `.env` file if one is not already present at `path`.
fn ensure_env_file(path: &str) -> anyhow::Result<()> {
    let env_path = Path::new(path);
    if env_path.exists() {
        return Ok(());
    }
    if let Some(parent) = env_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut content = String::new();
    content.push_str("PUBKEY=\n");
    content.push_str("KIND=1\n");
    content.push_str("DEFAULT_REFS=\n");
    fs::write(env_path, content)?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!("nostr_blocks={level},nblocks={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let out = run(cli)?;
    if !out.is_empty() {
        println!("{out}");
    }
    Ok(())
}
