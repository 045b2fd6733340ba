use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};
use wadmake::archive::{self, PackOptions};
use wadmake::{Directory, Lump, LumpName, LumpPatch, WadKind};

#[derive(Parser)]
#[command(name = "wadmake", about = "Inspect and edit WAD containers")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the lumps of a WAD
    List {
        input: PathBuf,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show container metadata
    Info {
        input: PathBuf,
    },
    /// Write every lump (or the lumps named NAME) to files
    Extract {
        input: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print one lump as hex
    Dump {
        input: PathBuf,
        /// 1-based lump index
        index: usize,
        /// Stop after this many bytes
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Build a new WAD from files; each lump is named after its file stem
    Pack {
        #[arg(short, long)]
        output: PathBuf,
        /// iwad or pwad
        #[arg(short, long, default_value = "pwad")]
        kind: WadKind,
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
    },
    /// Add a file as a lump, appending unless --at is given
    Add {
        wad: PathBuf,
        file: PathBuf,
        /// Lump name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,
        /// Insert before this 1-based index
        #[arg(long)]
        at: Option<usize>,
    },
    /// Remove the lump at a 1-based index
    Remove {
        wad: PathBuf,
        index: usize,
    },
    /// Rename the lump at a 1-based index
    Rename {
        wad: PathBuf,
        index: usize,
        name: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input, json } => {
            let (lumps, kind) = archive::read_container(&input)?;
            let infos = archive::list(&lumps);
            if json {
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                println!("{} ({kind})", input.display());
                println!("{:>6}  {:<8}  {:>10}  {:>10}", "Index", "Name", "Offset", "Size");
                for info in infos {
                    println!(
                        "{:>6}  {:<8}  {:>10}  {:>10}",
                        info.index, info.name, info.offset, info.size
                    );
                }
            }
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let (lumps, kind) = archive::read_container(&input)?;
            println!("── WAD ──────────────────────────────────────────────────");
            println!("  Path        {}", input.display());
            println!("  Kind        {kind}");
            println!("  Lumps       {}", lumps.len());
            println!("  Data size   {} B", lumps.total_data_size());
            println!("  File size   {} B", fs::metadata(&input)?.len());
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { input, output_dir, name } => {
            let (lumps, _) = archive::read_container(&input)?;
            fs::create_dir_all(&output_dir)?;
            let mut written = 0;
            for (i, lump) in lumps.iter().enumerate() {
                if name.as_deref().is_some_and(|n| lump.name != n) {
                    continue;
                }
                let path = output_dir.join(lump_file_name(i + 1, &lump.name));
                fs::write(&path, &lump.data)?;
                info!("extracted {}", path.display());
                written += 1;
            }
            println!("Extracted {written} lump(s) to {}", output_dir.display());
        }

        // ── Dump ─────────────────────────────────────────────────────────────
        Commands::Dump { input, index, limit } => {
            let (lumps, _) = archive::read_container(&input)?;
            let lump = lumps
                .get(index)
                .ok_or_else(|| format!("no lump at index {index} ({lumps})"))?;
            let end = limit.map_or(lump.data.len(), |l| l.min(lump.data.len()));
            println!("{} ({} bytes)", lump.name, lump.data.len());
            for (row, chunk) in lump.data[..end].chunks(16).enumerate() {
                println!("{}", dump_row(row * 16, chunk));
            }
        }

        // ── Pack ─────────────────────────────────────────────────────────────
        Commands::Pack { output, kind, input } => {
            let mut lumps = archive::create_directory();
            for path in &input {
                lumps.insert(Lump::new(stem_name(path)?, fs::read(path)?));
                println!("  packed  {}", path.display());
            }
            archive::write_container_with(&lumps, &output, PackOptions { kind })?;
            println!("Created: {} ({lumps})", output.display());
        }

        // ── Add ──────────────────────────────────────────────────────────────
        Commands::Add { wad, file, name, at } => {
            let name = match name {
                Some(n) => n,
                None => stem_name(&file)?,
            };
            let lump = Lump::new(name, fs::read(&file)?);
            edit(&wad, |lumps| {
                match at {
                    Some(index) => lumps.insert_at(index, lump)?,
                    None => lumps.insert(lump),
                }
                Ok(())
            })?;
        }

        // ── Remove ───────────────────────────────────────────────────────────
        Commands::Remove { wad, index } => {
            edit(&wad, |lumps| {
                let removed = lumps.remove(index)?;
                println!("Removed {}", removed.name);
                Ok(())
            })?;
        }

        // ── Rename ───────────────────────────────────────────────────────────
        Commands::Rename { wad, index, name } => {
            edit(&wad, |lumps| Ok(lumps.set(index, LumpPatch::name(name))?))?;
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Reads `path`, applies `f`, and writes it back with its original kind.
fn edit<F>(path: &Path, f: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut Directory) -> Result<(), Box<dyn std::error::Error>>,
{
    let (mut lumps, kind) = archive::read_container(path)?;
    f(&mut lumps)?;
    archive::write_container_with(&lumps, path, PackOptions { kind: kind.parse()? })?;
    println!("Updated: {} ({lumps})", path.display());
    Ok(())
}

fn stem_name(path: &Path) -> Result<String, String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_uppercase)
        .ok_or_else(|| format!("cannot derive a lump name from {}", path.display()))
}

/// `0001_THINGS.lmp`.  Lump names may contain bytes such as `\` or 0x80
/// that are not safe in file names.
fn lump_file_name(index: usize, name: &LumpName) -> String {
    let safe: String = name
        .as_bytes()
        .iter()
        .map(|&b| if b.is_ascii_alphanumeric() || b"-_[]".contains(&b) { b as char } else { '_' })
        .collect();
    format!("{index:04}_{safe}.lmp")
}

/// One `dump` line: offset, up to 16 bytes of hex, then the printable ASCII.
fn dump_row(offset: usize, chunk: &[u8]) -> String {
    let text: String = chunk
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect();
    format!("{offset:08x}  {:<32}  |{text}|", hex::encode(chunk))
}
