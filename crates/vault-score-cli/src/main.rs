use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, process};
use vault_score_config::Config;
use vault_score_engine::{
    Assembler, Engraver, ParseOptions, RandomSource, SeededRandom, ThreadRandom, io, parse_file,
};

const USAGE: &str = "\
Usage:
  vault-score-cli notes <note> <name> [--vault DIR] [--seed N]
  vault-score-cli score <note> [--pdf FILE] [--midi FILE] [--vault DIR] [--template FILE] [--seed N]";

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    /// Render a note to `<name>.txt`
    Notes { note: PathBuf, name: String },
    /// Render, assemble and engrave a note
    Score {
        note: PathBuf,
        pdf: PathBuf,
        midi: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Args {
    mode: Mode,
    vault: Option<PathBuf>,
    template: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut vault = None;
    let mut template = None;
    let mut seed = None;
    let mut pdf = None;
    let mut midi = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "--vault" => vault = Some(PathBuf::from(value("--vault")?)),
            "--template" => template = Some(PathBuf::from(value("--template")?)),
            "--pdf" => pdf = Some(PathBuf::from(value("--pdf")?)),
            "--midi" => midi = Some(PathBuf::from(value("--midi")?)),
            "--seed" => {
                let raw = value("--seed")?;
                seed = Some(raw.parse().with_context(|| format!("invalid seed '{raw}'"))?);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg.clone()),
        }
    }

    let mode = match positional.as_slice() {
        [cmd, note, name] if cmd == "notes" => Mode::Notes {
            note: PathBuf::from(note),
            name: name.clone(),
        },
        [cmd, note] if cmd == "score" => Mode::Score {
            note: PathBuf::from(note),
            pdf: pdf.unwrap_or_else(|| PathBuf::from("hello.pdf")),
            midi: midi.unwrap_or_else(|| PathBuf::from("hello.mid")),
        },
        _ => bail!("unexpected arguments"),
    };

    Ok(Args {
        mode,
        vault,
        template,
        seed,
    })
}

fn rng_for(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

/// Resolve the note against the vault unless it is already a usable path
fn note_path(note: &Path, vault: &Path) -> PathBuf {
    if note.is_absolute() || note.exists() {
        note.to_path_buf()
    } else {
        vault.join(note)
    }
}

fn run_notes(note: &Path, name: &str, vault: &Path, seed: Option<u64>) -> Result<()> {
    let options = ParseOptions::new(vault);
    let doc = parse_file(&note_path(note, vault), &options)?;
    log::info!("Parsed {} sections", doc.section_titles.len());

    let text = doc.root.render(rng_for(seed).as_mut());
    let written = io::write_text_output(Path::new("."), name, &text)?;
    println!("Notes written to {}", written.display());
    Ok(())
}

fn run_score(args: &Args, config: Option<&Config>, vault: &Path) -> Result<()> {
    let Mode::Score { note, pdf, midi } = &args.mode else {
        bail!("not a score invocation");
    };
    let template = args
        .template
        .clone()
        .or_else(|| config.map(|c| c.template_path.clone()))
        .context("No score template given; pass --template or set template_path in the config file")?;

    let options = ParseOptions::new(vault);
    let doc = parse_file(&note_path(note, vault), &options)?;
    let rendered = doc.root.render(rng_for(args.seed).as_mut());

    let mut assembler = Assembler::new(template);
    if let Some(config) = config {
        assembler = assembler.with_output_path(&config.lily_output_path);
    }
    let score = assembler.assemble(&rendered)?;

    let engraver = match config {
        Some(config) => Engraver::new(&config.lilypond_executable)
            .with_timeout(Duration::from_secs(config.render_timeout_secs)),
        None => Engraver::new("lilypond"),
    };
    log::info!("Engraving {} with a {:?} timeout", note.display(), engraver.timeout());
    engraver.render_to_files(&score, pdf, midi)?;
    println!("PDF written to {}", pdf.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let argv: Vec<String> = env::args().collect();
    let args = match parse_args(argv.get(1..).unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let vault = match (&args.vault, &config) {
        (Some(vault), _) => vault.clone(),
        (None, Some(config)) => config.vault_path.clone(),
        (None, None) => {
            eprintln!("Error: No vault path provided and no config file found");
            eprintln!("Pass --vault or create a config file at {}", config_path.display());
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_vault_dir(&vault) {
        eprintln!("Error: Vault path '{}' is invalid: {e}", vault.display());
        process::exit(1);
    }

    let result = match &args.mode {
        Mode::Notes { note, name } => run_notes(note, name, &vault, args.seed),
        Mode::Score { .. } => run_score(&args, config.as_ref(), &vault),
    };

    if let Err(e) = result {
        log::error!("{e:#}");
        process::exit(1);
    }

    Ok(())
}
