use anyhow::Context;
use bytepair::tokenizer::Tokenizer;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{Read, Write};
use std::path::PathBuf;

type T = u32;

/// Byte-level BPE tokenizer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Train merges over a file and write a merge file.
    Train(TrainArgs),
    /// Encode a file (or stdin) into token ids.
    Encode(EncodeArgs),
    /// Decode token ids into bytes on stdout.
    Decode(DecodeArgs),
    /// Print a summary of a merge file.
    Info(InfoArgs),
}

/// Arguments for `train`.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Training corpus path.
    #[arg(long)]
    pub input: PathBuf,

    /// Vocab size.
    #[arg(long, default_value = "1024")]
    pub vocab_size: usize,

    /// Merge file output path.
    #[arg(long)]
    pub output: PathBuf,
}

/// Arguments for `encode`.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Merge file path.
    #[arg(long)]
    pub model: PathBuf,

    /// Input path; reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// Arguments for `decode`.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Merge file path.
    #[arg(long)]
    pub model: PathBuf,

    /// Token ids.
    #[arg(required = true, value_delimiter = ',')]
    pub ids: Vec<T>,
}

/// Arguments for `info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Merge file path.
    #[arg(long)]
    pub model: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    log::debug!("{:#?}", cli);

    match cli.command {
        Command::Train(args) => run_train(args),
        Command::Encode(args) => run_encode(args),
        Command::Decode(args) => run_decode(args),
        Command::Info(args) => run_info(args),
    }
}

/// The default level for a `-v` count.
fn verbosity_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Starts from the `-v` level; `RUST_LOG` directives, when set, override it.
fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbosity_level(verbose));
    builder.parse_env(env_logger::Env::default());
    builder.format_timestamp_millis();
    builder
        .try_init()
        .context("failed to initialize logging")
}

fn load_tokenizer(path: &PathBuf) -> anyhow::Result<Tokenizer<T>> {
    Tokenizer::load_from_path(path)
        .with_context(|| format!("failed to load merge file {}", path.display()))
}

fn run_train(args: TrainArgs) -> anyhow::Result<()> {
    let corpus = std::fs::read(&args.input)
        .with_context(|| format!("failed to read corpus {}", args.input.display()))?;

    let mut tokenizer = Tokenizer::<T>::new_with_vocab_size(args.vocab_size)?;

    let t0 = std::time::Instant::now();
    let outcome = tokenizer.train(&corpus).context("training failed")?;
    let training_duration = std::time::Instant::now().duration_since(t0);

    tokenizer
        .save_to_path(&args.output)
        .with_context(|| format!("failed to write merge file {}", args.output.display()))?;

    log::info!("- training_duration: {:#?}", training_duration);
    log::info!(
        "- merges: {} ({:?})",
        outcome.merges_done,
        outcome.stop_reason
    );
    if !outcome.tokens.is_empty() {
        log::info!(
            "- bytes/token: {:.2}",
            corpus.len() as f64 / outcome.tokens.len() as f64
        );
    }
    log::info!("- merge file: {:?}", args.output);

    Ok(())
}

fn run_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let tokenizer = load_tokenizer(&args.model)?;

    let input = match &args.input {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read input {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let tokens = tokenizer.encode(&input)?;
    let line = tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("{line}");

    Ok(())
}

fn run_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let tokenizer = load_tokenizer(&args.model)?;
    let bytes = tokenizer.decode(&args.ids)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;

    Ok(())
}

fn run_info(args: InfoArgs) -> anyhow::Result<()> {
    let tokenizer = load_tokenizer(&args.model)?;
    let model = tokenizer.model()?;

    let (longest, bytes) = model.longest_token();
    println!("- vocab_size: {}", model.vocab_size());
    println!("- merges: {}", model.merges().len());
    println!(
        "- longest token: {} ({} bytes): {:?}",
        longest,
        bytes.len(),
        String::from_utf8_lossy(bytes)
    );

    Ok(())
}
