use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use topicprep::config::Config;
use topicprep::corpus::{build_corpus_dictionary, token_count};
use topicprep::evaluation::grid::{compare_models, ParameterGrid, TermWeight};
use topicprep::evaluation::{coherence_npmi, coherence_umass, perplexity};
use topicprep::models::lda::build_lda_with_corpus;
use topicprep::models::word2vec::{build_word2vec, Word2VecParams};
use topicprep::output::terminal;
use topicprep::summary;
use topicprep::text::io::{load_documents, load_lines};
use topicprep::text::language::Language;
use topicprep::text::TextContext;

/// topicprep: text preprocessing and topic modeling.
///
/// Cleans line-oriented text files, builds bag-of-words corpora, trains LDA
/// and word2vec models, and compares LDA models across a parameter grid.
#[derive(Parser)]
#[command(name = "topicprep", version, about)]
struct Cli {
    /// Cleaning language (overrides TOPICPREP_LANGUAGE)
    #[arg(long, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cleaned tokens of every line
    Clean {
        file: PathBuf,

        /// Shortest token to keep (overrides TOPICPREP_MIN_LENGTH)
        #[arg(long)]
        min_length: Option<usize>,
    },

    /// Print the file's sentences, one per line
    Sentences { file: PathBuf },

    /// Train an LDA model on the file's lines and summarize it
    Topics {
        file: PathBuf,

        #[arg(long)]
        num_topics: Option<usize>,

        #[arg(long)]
        passes: Option<usize>,

        /// Drop terms found in fewer documents than this
        #[arg(long)]
        min_count: Option<u32>,

        /// Terms shown per topic
        #[arg(long, default_value = "10")]
        topn: usize,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Train one LDA model per alpha/beta/num_topics grid point and rank them
    Compare {
        file: PathBuf,

        /// Terms per topic used for coherence and topic export
        #[arg(long, default_value = "10")]
        topn: usize,

        #[arg(long)]
        min_count: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Train word2vec on the file and show a word's nearest neighbours
    Similar {
        file: PathBuf,
        word: String,

        #[arg(long, default_value = "10")]
        topn: usize,

        /// Ignore words seen fewer times than this
        #[arg(long, default_value = "5")]
        min_count: u64,
    },
}

/// JSON layout of the `topics` command.
#[derive(Serialize)]
struct TopicsReport {
    topics: Vec<Vec<TermWeight>>,
    document_topics: Vec<usize>,
    perplexity: f64,
    u_mass: Vec<f64>,
    c_npmi: Vec<f64>,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicprep=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(language) = &cli.language {
        config.language = language.parse::<Language>()?;
    }
    let ctx = TextContext::for_language(config.language);
    info!(language = %config.language, min_length = config.min_length, "Text context ready");

    match cli.command {
        Commands::Clean { file, min_length } => {
            let min_length = min_length.unwrap_or(config.min_length);
            for tokens in ctx.preprocess(&load_lines(&file)?, min_length) {
                println!("{}", tokens.join(" "));
            }
        }

        Commands::Sentences { file } => {
            let text = load_lines(&file)?.join("\n");
            for sentence in ctx.split_sentences(&text) {
                println!("{sentence}");
            }
        }

        Commands::Topics {
            file,
            num_topics,
            passes,
            min_count,
            topn,
            json,
        } => {
            if let Some(k) = num_topics {
                config.num_topics = k;
            }
            if let Some(p) = passes {
                config.passes = p;
            }
            if let Some(c) = min_count {
                config.min_count = c;
            }

            let (lines, documents) = load_documents(&file, &ctx, config.min_length)?;
            let (corpus, dictionary) = build_corpus_dictionary(&documents, config.min_count);
            println!(
                "Loaded {} documents ({} terms after pruning, {} tokens)",
                corpus.len(),
                dictionary.len(),
                token_count(&corpus)
            );

            let pb = spinner(format!("Training LDA ({} topics)...", config.num_topics));
            let model = build_lda_with_corpus(&corpus, &dictionary, &config.lda_params());
            pb.finish_and_clear();
            let model = model?;

            let topic_terms = summary::get_topic_terms(&model, topn)?;
            let strongest = summary::get_strongest_document_topics(&model, &corpus)?;
            let perplexity = perplexity(&model, &corpus)?;
            let u_mass = coherence_umass(&model, &corpus, topn)?;
            let c_npmi = coherence_npmi(&model, &corpus, topn)?;

            if json {
                let report = TopicsReport {
                    topics: topic_terms
                        .into_iter()
                        .map(|terms| {
                            terms
                                .into_iter()
                                .map(|(term, prob)| TermWeight { term, prob })
                                .collect()
                        })
                        .collect(),
                    document_topics: strongest,
                    perplexity,
                    u_mass,
                    c_npmi,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                terminal::display_topics(&topic_terms);
                terminal::display_document_topics(&lines, &strongest);
                terminal::display_evaluation(perplexity, &u_mass, &c_npmi);
            }
        }

        Commands::Compare {
            file,
            topn,
            min_count,
            json,
        } => {
            if let Some(c) = min_count {
                config.min_count = c;
            }

            let (_, documents) = load_documents(&file, &ctx, config.min_length)?;
            let (corpus, dictionary) = build_corpus_dictionary(&documents, config.min_count);
            let grid = ParameterGrid::default();
            println!(
                "Comparing {} models on {} documents ({} terms)...",
                grid.len(),
                corpus.len(),
                dictionary.len()
            );

            let comparison = compare_models(&corpus, &dictionary, &grid, &config.lda_params(), topn)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                terminal::display_comparison(&comparison);
            }
        }

        Commands::Similar {
            file,
            word,
            topn,
            min_count,
        } => {
            let (_, sentences) = load_documents(&file, &ctx, config.min_length)?;

            // Query words go through the same cleaning as the training text
            let query = ctx
                .clean(&word, 0)
                .into_iter()
                .next()
                .unwrap_or_else(|| word.to_lowercase());

            let params = Word2VecParams {
                min_count,
                random_state: config.random_state,
                ..Word2VecParams::default()
            };
            let pb = spinner("Training word2vec...".to_string());
            let model = build_word2vec(&sentences, &params);
            pb.finish_and_clear();
            let model = model?;

            if !model.contains(&query) {
                println!(
                    "{} \"{}\" is not in the vocabulary ({} words). Try a lower --min-count.",
                    "Warning:".yellow(),
                    query,
                    model.vocab_len()
                );
                return Ok(());
            }
            terminal::display_similar_words(&query, &model.most_similar(&query, topn)?);
        }
    }

    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
