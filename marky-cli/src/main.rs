use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use marky_core::config::GenerationConfig;
use marky_core::model::chain::Chain;

/// Learns a text file, then writes sentences starting from the words you type.
#[derive(Parser, Debug)]
#[command(name = "marky", version, about)]
struct Args {
    /// Text to learn from, one sentence per line
    #[arg(long, default_value = "data/sample.txt")]
    data: PathBuf,

    /// Seed for reproducible sentences
    #[arg(long)]
    seed: Option<u64>,

    /// Stop a sentence after this many words
    #[arg(long, default_value_t = 200)]
    max_words: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = GenerationConfig {
        max_words: Some(args.max_words),
        seed: args.seed,
    };
    config.validate()?;

    println!("Welcome to Marky Markov's Random Text Generator!");

    // Learn every line of the corpus, then compute the probabilities
    let mut chain = Chain::from_file(&args.data, config.random_source())
        .with_context(|| format!("failed to learn from {}", args.data.display()))?;
    info!("{} words can start a sentence", chain.table().len());

    println!("Done learning! Now give me a word and I'll write a sentence based on that word.");
    println!("(an empty line picks a random word, 'done' quits)");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let word = line.trim();
        if word == "done" {
            break;
        }

        let start = if word.is_empty() {
            match chain.random_starting_word() {
                Some(start) => start,
                None => {
                    println!("Nothing learned yet.");
                    continue;
                }
            }
        } else {
            word.to_owned()
        };

        println!("{}", chain.generate_sentence_with(&start, &config)?);
    }

    Ok(())
}
