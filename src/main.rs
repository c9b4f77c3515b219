use clap::{Parser, Subcommand};
use seratocrate::chunk::{decode_text, tag_name, Chunk, Chunks, TAG_PATH, TAG_TRACK, TAG_VERSION};
use seratocrate::crate_file::CRATE_EXTENSION;
use seratocrate::recovery::scan_file;
use seratocrate::{Crate, LibraryConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "seratocrate", about = "Read and edit Serato .crate files")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Crate folder (default: ~/Music/_Serato_/SubCrates)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List crates and their track counts
    List,
    /// Print the tracks of a crate, in order
    Show {
        /// Crate name, or a path to a .crate file
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Append tracks to a crate, creating it if missing
    Add {
        name: String,
        #[arg(required = true, num_args = 1..)]
        tracks: Vec<String>,
    },
    /// Remove tracks from a crate
    Remove {
        name: String,
        #[arg(required = true, num_args = 1..)]
        tracks: Vec<String>,
    },
    /// Dump the chunk structure of a crate file
    Inspect {
        file: PathBuf,
    },
    /// Recover tracks from a damaged crate by scanning for path tags
    Scan {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CrateListing<'a> {
    name:   &'a str,
    path:   String,
    tracks: &'a [String],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = library_config(cli.dir)?;
    info!(dir = %config.subcrates_dir.display(), "using crate folder");

    match cli.command {

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List => {
            let mut crates = config.list_crates()?;
            seratocrate::library::load_all(&mut crates)?;
            println!("{:<32} {:>7}", "Crate", "Tracks");
            for c in &mut crates {
                let count = c.song_paths()?.len();
                println!("{:<32} {:>7}", c.name(), count);
            }
        }

        // ── Show ─────────────────────────────────────────────────────────────
        Commands::Show { name, json } => {
            let mut c = resolve_crate(&config, &name);
            let path = c.path().display().to_string();
            let name = c.name().to_owned();
            let tracks = c.song_paths()?;
            if json {
                let listing = CrateListing { name: &name, path, tracks };
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for t in tracks {
                    println!("{t}");
                }
            }
        }

        // ── Add ──────────────────────────────────────────────────────────────
        Commands::Add { name, tracks } => {
            let mut c = resolve_crate(&config, &name);
            if c.path().exists() {
                c.song_paths()?;
            }
            for t in &tracks {
                c.add_song(t)?;
            }
            c.save()?;
            println!("Added {} track(s) to {}", tracks.len(), c.path().display());
        }

        // ── Remove ───────────────────────────────────────────────────────────
        Commands::Remove { name, tracks } => {
            let mut c = resolve_crate(&config, &name);
            let mut removed = 0usize;
            for t in &tracks {
                if c.remove_song(t)? {
                    removed += 1;
                } else {
                    eprintln!("  not in crate: {t}");
                }
            }
            c.save()?;
            println!("Removed {removed} track(s) from {}", c.path().display());
        }

        // ── Inspect ──────────────────────────────────────────────────────────
        Commands::Inspect { file } => {
            let raw = std::fs::read(&file)?;
            println!("{} ({} bytes)", file.display(), raw.len());
            print_chunks(Chunks::new(&raw), 1)?;
        }

        // ── Scan ─────────────────────────────────────────────────────────────
        Commands::Scan { file, json } => {
            let report = scan_file(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report.paths())?);
            } else {
                println!("{}", report.summary());
                for t in &report.tracks {
                    println!("  @{:<8} {}", t.tag_offset, t.path);
                }
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn library_config(dir: Option<PathBuf>) -> Result<LibraryConfig, Box<dyn std::error::Error>> {
    match (dir, LibraryConfig::default_for_user()) {
        (Some(dir), Some(cfg)) => Ok(cfg.with_subcrates_dir(dir)),
        (Some(dir), None)      => Ok(LibraryConfig::from_subcrates_dir(dir)),
        (None, Some(cfg))      => Ok(cfg),
        (None, None)           => Err("no home directory; pass --dir".into()),
    }
}

/// A name containing a separator or ending in `.crate` is a file path;
/// anything else is looked up in the crate folder.
fn resolve_crate(config: &LibraryConfig, name: &str) -> Crate {
    let as_path = Path::new(name);
    if name.contains(std::path::MAIN_SEPARATOR) || as_path.extension().map_or(false, |e| e == CRATE_EXTENSION) {
        Crate::open(as_path)
    } else {
        config.crate_named(name)
    }
}

fn print_chunks(chunks: Chunks<'_>, depth: usize) -> Result<(), Box<dyn std::error::Error>> {
    for chunk in chunks {
        let chunk = chunk?;
        print_chunk(&chunk, depth);
        if chunk.tag == TAG_TRACK {
            print_chunks(chunk.children(), depth + 1)?;
        }
    }
    Ok(())
}

fn print_chunk(chunk: &Chunk<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    let detail = match chunk.tag {
        TAG_PATH | TAG_VERSION => format!("{:?}", decode_text(chunk.payload)),
        TAG_TRACK => String::new(),
        _ => {
            let preview = &chunk.payload[..chunk.payload.len().min(16)];
            format!("{}{}", hex::encode(preview), if chunk.payload.len() > 16 { "…" } else { "" })
        }
    };
    println!("{indent}@{:<8} {} {:>6} B  {detail}", chunk.offset, tag_name(&chunk.tag), chunk.payload.len());
}
