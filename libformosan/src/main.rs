use anyhow::Context as _;
use clap::{Parser, Subcommand};
use libformosan::{create_ime_engine, parse_keys, FormosanConfig, ImeEngine};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "libformosan")]
#[command(about = "Phrase-table input method for Formosan languages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Table data directory (defaults to $FOX_DATA_DIR or the XDG data home)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Table to activate: option index (0-41), table id (TW_xx) or name
    #[arg(long, global = true)]
    table: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tables
    Tables,
    /// Print completions for a prefix
    Complete {
        /// Romanized prefix as typed
        prefix: String,
    },
    /// Interactive mode: each line is a key script, e.g. `nga'ay<Return>`
    Repl,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<FormosanConfig> {
    let mut config = match &cli.config {
        Some(path) => FormosanConfig::load_toml(path)?,
        None => FormosanConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(table) = &cli.table {
        match table.parse::<usize>() {
            Ok(index) => {
                config.table = index;
                config.base.default_table = None;
            }
            Err(_) => config.base.default_table = Some(table.clone()),
        }
    }
    Ok(config)
}

fn list_tables(engine: &ImeEngine) {
    let active = engine.catalog().active_descriptor().map(|d| d.id.clone());
    if engine.catalog().tables().is_empty() {
        println!("(no tables in {})", engine.catalog().root().display());
        return;
    }
    for (i, d) in engine.catalog().tables().iter().enumerate() {
        let marker = if active.as_deref() == Some(d.id.as_str()) { '*' } else { ' ' };
        println!("{} {:>2}  {}  {}", marker, i, d.id, d.display_name);
    }
}

fn print_completions(engine: &ImeEngine, prefix: &str) {
    let candidates = engine.matcher().complete(prefix);
    if candidates.is_empty() {
        println!("  (no candidates found)");
        return;
    }
    for (i, c) in candidates.iter().enumerate() {
        println!("{}. {}  {}", i + 1, c.display_text, c.description);
    }
}

fn print_context(engine: &mut ImeEngine) {
    let commit = engine.take_commit();
    if !commit.is_empty() {
        println!("commit: {:?}", commit);
    }
    let ctx = engine.context();
    if ctx.preedit_text.is_empty() {
        return;
    }
    let (before, after): (String, String) = {
        let chars: Vec<char> = ctx.preedit_text.chars().collect();
        let split = ctx.preedit_cursor.min(chars.len());
        (chars[..split].iter().collect(), chars[split..].iter().collect())
    };
    println!("preedit: {}|{}", before, after);
    for (i, (text, desc)) in ctx.candidates.iter().zip(&ctx.descriptions).enumerate() {
        let marker = if i == ctx.candidate_cursor { '>' } else { ' ' };
        println!("{}{}. {}  {}", marker, i + 1, text, desc);
    }
    if !ctx.auxiliary_text.is_empty() {
        println!("page {}", ctx.auxiliary_text);
    }
}

fn run_repl(engine: &mut ImeEngine) -> anyhow::Result<()> {
    println!("libformosan REPL: type a key script per line, e.g. nga'ay<Return>");
    println!(":tables, :table <id>, :select <n>, :reset. Ctrl-D to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let input = line.trim_end_matches(['\r', '\n']);
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix(':') {
            let mut parts = command.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("tables"), _) => list_tables(engine),
                (Some("table"), Some(id)) => {
                    let ok = match id.parse::<usize>() {
                        Ok(index) => engine.select_table(index),
                        Err(_) => engine.select_table(id),
                    };
                    if !ok {
                        println!("cannot select table {}", id);
                    }
                }
                (Some("select"), Some(n)) => match n.parse::<usize>() {
                    Ok(n) if n >= 1 && engine.select_candidate(n - 1) => {}
                    _ => println!("no candidate {}", n),
                },
                (Some("reset"), _) => engine.reset(),
                _ => println!("unknown command :{}", command),
            }
            print_context(engine);
            continue;
        }

        let keys = match parse_keys(input) {
            Ok(keys) => keys,
            Err(e) => {
                println!("error: {}", e);
                continue;
            }
        };
        for key in &keys {
            let response = engine.process_key(key);
            if !response.handled {
                // Unhandled keys would reach the application as-is
                if let Some(ch) = key.text {
                    println!("passthrough: {:?}", ch);
                }
            }
            if response.error {
                println!("(beep)");
            }
        }
        print_context(engine);
        io::stdout().flush()?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut engine = create_ime_engine(&config)?;

    match cli.command {
        Some(Commands::Tables) => list_tables(&engine),
        Some(Commands::Complete { prefix }) => print_completions(&engine, &prefix),
        Some(Commands::Repl) | None => run_repl(&mut engine)?,
    }
    Ok(())
}
