use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::LevelFilter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use marko_core::model::params::{
    DEFAULT_COUNT, DEFAULT_MAX_TRIES, DEFAULT_MIN_TRIES, DEFAULT_STEP_LIMIT,
};
use marko_core::model::chain::DEFAULT_STATE_SIZE;
use marko_core::model::novelty::{DEFAULT_MAX_OVERLAP_RATIO, DEFAULT_MAX_OVERLAP_TOTAL};
use marko_core::model::tokenizer::SentenceSplit;
use marko_core::{GenerationParams, Generator};

#[derive(Parser)]
#[command(name = "marko", about = "Generate new sentences from a text with a Markov chain")]
struct Cli {
    /// Text file to learn from, `-` for stdin
    input: PathBuf,

    /// Window length of the chain (1 to 5, anything else falls back to 2)
    #[arg(long, default_value_t = DEFAULT_STATE_SIZE)]
    state_size: usize,

    /// Number of sentences to attempt
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Smallest per-sentence try budget
    #[arg(long, default_value_t = DEFAULT_MIN_TRIES)]
    min_tries: usize,

    /// Largest per-sentence try budget
    #[arg(long, default_value_t = DEFAULT_MAX_TRIES)]
    max_tries: usize,

    /// Maximum words per sampling run
    #[arg(long, default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Drop sentences that copy too long a run of the input
    #[arg(long)]
    reject_copies: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_OVERLAP_RATIO)]
    max_overlap_ratio: f32,

    #[arg(long, default_value_t = DEFAULT_MAX_OVERLAP_TOTAL)]
    max_overlap_total: usize,

    #[arg(long)]
    min_words: Option<usize>,

    #[arg(long)]
    max_words: Option<usize>,

    #[arg(long)]
    max_chars: Option<usize>,

    /// Also split lines into sentences on `.`, `!` and `?`
    #[arg(long)]
    punctuation: bool,

    /// Skip input sentences with quotes, parentheses or brackets
    #[arg(long)]
    well_formed: bool,

    /// Words every generated sentence starts with
    #[arg(long)]
    start: Option<String>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn params(&self) -> GenerationParams {
        GenerationParams {
            state_size: self.state_size,
            count: self.count,
            min_tries: self.min_tries,
            max_tries: self.max_tries,
            step_limit: self.step_limit,
            test_output: self.reject_copies,
            max_overlap_ratio: self.max_overlap_ratio,
            max_overlap_total: self.max_overlap_total,
            min_words: self.min_words,
            max_words: self.max_words,
            max_chars: self.max_chars,
            split: if self.punctuation { SentenceSplit::Punctuation } else { SentenceSplit::Lines },
            well_formed: self.well_formed,
            start: self.start.clone(),
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    match verbose {
        0 => (),
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    let _ = builder.try_init();
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("unable to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let text = read_input(&cli.input)?;
    let generator = Generator::new(&text, cli.params())?;

    let sentences = match cli.seed {
        Some(seed) => generator.generate(&mut ChaCha8Rng::seed_from_u64(seed))?,
        None => generator.generate(&mut rand::rng())?,
    };

    for sentence in sentences {
        println!("{sentence}");
    }

    Ok(())
}
