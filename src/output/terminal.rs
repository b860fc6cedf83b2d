// Colored terminal output for topics, evaluation metrics and model
// comparisons. The CLI's display steps delegate here.

use colored::Colorize;

use super::{truncate_chars, weight_bar};
use crate::evaluation::grid::ModelComparison;

const BAR_WIDTH: usize = 20;

/// Display every topic's top terms, with a weight bar for the leading term.
pub fn display_topics(topics: &[Vec<(String, f64)>]) {
    println!(
        "\n{}",
        format!("=== Topics ({}) ===", topics.len()).bold()
    );
    println!();

    // Bars are scaled relative to the heaviest leading term
    let scale = max_weight(topics);

    for (i, terms) in topics.iter().enumerate() {
        let lead = terms.first().map_or(0.0, |(_, p)| *p);
        let relative = lead / scale;
        println!(
            "  {:>2}. {} {:.3}",
            i,
            colorize_bar(&weight_bar(relative, BAR_WIDTH), relative),
            lead
        );
        let terms_str = terms
            .iter()
            .map(|(term, p)| format!("{term} ({p:.3})"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("      {}", terms_str.dimmed());
    }
    println!();
}

/// Display each document's strongest topic next to a preview of its text.
pub fn display_document_topics(previews: &[String], strongest: &[usize]) {
    println!(
        "\n{}",
        format!("=== Strongest topic per document ({}) ===", strongest.len()).bold()
    );
    println!();

    for (i, topic) in strongest.iter().enumerate() {
        let preview = previews.get(i).map(|p| truncate_chars(p, 60)).unwrap_or_default();
        println!("  {:>5}  topic {:>2}  {}", i, topic.to_string().cyan(), preview.dimmed());
    }
    println!();
}

/// Display perplexity and per-topic coherence of one model.
pub fn display_evaluation(perplexity: f64, u_mass: &[f64], c_npmi: &[f64]) {
    println!("\n{}", "=== Evaluation ===".bold());
    println!("  Perplexity: {:.2}", perplexity);
    println!();
    println!(
        "  {:>5}  {:>8}  {:>8}",
        "Topic".dimmed(),
        "u_mass".dimmed(),
        "c_npmi".dimmed()
    );
    println!("  {}", "-".repeat(25).dimmed());
    for (topic, (u, n)) in u_mass.iter().zip(c_npmi).enumerate() {
        println!("  {:>5}  {:>8.3}  {:>8}", topic, u, colorize_npmi(*n));
    }
    println!();
}

/// Display a ranked model comparison table, best mean rank first.
pub fn display_comparison(comparison: &ModelComparison) {
    if comparison.metrics.is_empty() {
        println!("No models were compared.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Model Comparison ({} models) ===", comparison.metrics.len()).bold()
    );
    println!();

    println!(
        "  {:<28} {:>6} {:>6} {:>4}  {:>10} {:>8} {:>8}  {:>6} {:>4}",
        "Model".dimmed(),
        "Alpha".dimmed(),
        "Beta".dimmed(),
        "K".dimmed(),
        "Perplexity".dimmed(),
        "u_mass".dimmed(),
        "c_npmi".dimmed(),
        "Mean".dimmed(),
        "Best".dimmed(),
    );
    println!("  {}", "-".repeat(92).dimmed());

    let mut rows: Vec<_> = comparison.metrics.iter().collect();
    rows.sort_by(|a, b| {
        a.mean_rank
            .partial_cmp(&b.mean_rank)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for m in rows {
        println!(
            "  {:<28} {:>6} {:>6} {:>4}  {:>10.2} {:>8.3} {:>8.3}  {:>6} {:>4}",
            m.model_id,
            m.alpha,
            m.eta,
            m.num_topics,
            m.perplexity,
            m.u_mass,
            m.c_npmi,
            format!("{:.2}", m.mean_rank),
            colorize_rank(m.best_rank),
        );
    }

    if let Some(best) = comparison.best() {
        println!();
        println!("  {} {}", "Best:".green().bold(), best.model_id.bold());
    }
    println!();
}

/// Display a word's nearest neighbours.
pub fn display_similar_words(word: &str, neighbours: &[(String, f32)]) {
    println!(
        "\n{}",
        format!("=== Most similar to \"{word}\" ===").bold()
    );
    println!();

    if neighbours.is_empty() {
        println!("  No neighbours found.");
        return;
    }

    for (i, (other, sim)) in neighbours.iter().enumerate() {
        let weight = f64::from(sim.max(0.0));
        println!(
            "  {:>2}. {:<24} {} {:.3}",
            i + 1,
            other.bold(),
            colorize_bar(&weight_bar(weight, BAR_WIDTH), weight),
            sim
        );
    }
    println!();
}

fn max_weight(topics: &[Vec<(String, f64)>]) -> f64 {
    topics
        .iter()
        .filter_map(|terms| terms.first().map(|(_, p)| *p))
        .fold(f64::MIN_POSITIVE, f64::max)
}

/// Color a bar based on its weight.
fn colorize_bar(bar: &str, weight: f64) -> colored::ColoredString {
    if weight >= 0.66 {
        bar.bright_green()
    } else if weight >= 0.33 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}

fn colorize_npmi(score: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score > 0.1 {
        text.green()
    } else if score < -0.1 {
        text.red()
    } else {
        text.normal()
    }
}

fn colorize_rank(rank: usize) -> colored::ColoredString {
    match rank {
        1 => rank.to_string().green().bold(),
        2 | 3 => rank.to_string().yellow(),
        _ => rank.to_string().dimmed(),
    }
}
