// Parameter-grid comparison of LDA models.
//
// Trains one model per (alpha, eta, num_topics) combination on the same
// corpus, scores each one, and ranks every metric across the grid. The
// result serializes to the JSON layout the comparison views consume
// (`modelId`, `alpha`, `beta`, `num_topics`, metric columns and ranks).

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{coherence_npmi, coherence_umass, perplexity};
use crate::corpus::dictionary::Dictionary;
use crate::corpus::BowDocument;
use crate::models::lda::{build_lda_with_corpus, LdaParams, Prior};
use crate::models::traits::TopicModel;

/// Values to sweep. Every combination is trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    pub alphas: Vec<f64>,
    pub etas: Vec<f64>,
    pub num_topics: Vec<usize>,
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self {
            alphas: vec![0.01, 0.1, 1.0, 10.0],
            etas: vec![0.01, 0.1, 1.0, 10.0],
            num_topics: vec![5, 10, 15, 20],
        }
    }
}

impl ParameterGrid {
    pub fn len(&self) -> usize {
        self.alphas.len() * self.etas.len() * self.num_topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every (alpha, eta, num_topics) combination, num_topics varying slowest.
    pub fn points(&self) -> Vec<(f64, f64, usize)> {
        let mut points = Vec::with_capacity(self.len());
        for &k in &self.num_topics {
            for &alpha in &self.alphas {
                for &eta in &self.etas {
                    points.push((alpha, eta, k));
                }
            }
        }
        points
    }
}

/// Scores and ranks of one trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    #[serde(rename = "modelId")]
    pub model_id: String,
    pub alpha: f64,
    #[serde(rename = "beta")]
    pub eta: f64,
    pub num_topics: usize,
    pub perplexity: f64,
    pub u_mass: f64,
    pub c_npmi: f64,
    /// Mean of the per-metric ranks (1 = best)
    pub mean_rank: f64,
    pub best_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,
    pub prob: f64,
}

/// Top terms of every topic of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTopics {
    #[serde(rename = "modelId")]
    pub model_id: String,
    pub topics: Vec<Vec<TermWeight>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub metrics: Vec<ModelMetrics>,
    pub topics: Vec<ModelTopics>,
}

impl ModelComparison {
    /// The model with the lowest mean rank. Ties go to the earlier grid point.
    pub fn best(&self) -> Option<&ModelMetrics> {
        self.metrics.iter().fold(None, |best: Option<&ModelMetrics>, m| match best {
            Some(b) if b.mean_rank <= m.mean_rank => Some(b),
            _ => Some(m),
        })
    }
}

pub fn model_id(alpha: f64, eta: f64, num_topics: usize) -> String {
    format!("lda_k{num_topics}_a{alpha}_b{eta}")
}

/// Train and score one model per grid point.
///
/// `base_params` supplies everything the grid doesn't sweep (passes,
/// iterations, random_state, minimum_probability). Coherence is computed
/// over the top `topn` terms of each topic and averaged across topics.
pub fn compare_models(
    corpus: &[BowDocument],
    dictionary: &Dictionary,
    grid: &ParameterGrid,
    base_params: &LdaParams,
    topn: usize,
) -> Result<ModelComparison> {
    if grid.is_empty() {
        anyhow::bail!("Parameter grid is empty — need at least one alpha, eta and num_topics");
    }

    info!(models = grid.len(), topn, "Comparing LDA models");

    let pb = ProgressBar::new(grid.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Models [{bar:30}] {pos}/{len} {msg}")
            .unwrap(),
    );

    let mut metrics = Vec::with_capacity(grid.len());
    let mut topics = Vec::with_capacity(grid.len());

    for (alpha, eta, k) in grid.points() {
        let id = model_id(alpha, eta, k);
        pb.set_message(id.clone());

        let params = LdaParams {
            num_topics: k,
            alpha: Prior::Scalar(alpha),
            eta: Some(Prior::Scalar(eta)),
            ..base_params.clone()
        };
        let model = build_lda_with_corpus(corpus, dictionary, &params)?;

        let perplexity = perplexity(&model, corpus)?;
        let u_mass = mean(&coherence_umass(&model, corpus, topn)?);
        let c_npmi = mean(&coherence_npmi(&model, corpus, topn)?);
        debug!(model = %id, perplexity, u_mass, c_npmi, "Model scored");

        topics.push(ModelTopics {
            model_id: id.clone(),
            topics: export_topics(&model, topn)?,
        });
        metrics.push(ModelMetrics {
            model_id: id,
            alpha,
            eta,
            num_topics: k,
            perplexity,
            u_mass,
            c_npmi,
            mean_rank: 0.0,
            best_rank: 0,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    assign_ranks(&mut metrics);

    let comparison = ModelComparison { metrics, topics };
    if let Some(best) = comparison.best() {
        info!(model = %best.model_id, mean_rank = best.mean_rank, "Model comparison complete");
    }
    Ok(comparison)
}

fn export_topics<M: TopicModel + ?Sized>(model: &M, topn: usize) -> Result<Vec<Vec<TermWeight>>> {
    (0..model.num_topics())
        .map(|topic| {
            Ok(model
                .show_topic(topic, topn)?
                .into_iter()
                .map(|(term, prob)| TermWeight { term, prob })
                .collect())
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Fill `mean_rank` and `best_rank`. Lower perplexity ranks higher; higher
/// coherence ranks higher.
fn assign_ranks(metrics: &mut [ModelMetrics]) {
    let perplexity: Vec<f64> = metrics.iter().map(|m| -m.perplexity).collect();
    let u_mass: Vec<f64> = metrics.iter().map(|m| m.u_mass).collect();
    let c_npmi: Vec<f64> = metrics.iter().map(|m| m.c_npmi).collect();
    let columns = [rank_descending(&perplexity), rank_descending(&u_mass), rank_descending(&c_npmi)];

    for (i, m) in metrics.iter_mut().enumerate() {
        let ranks: Vec<usize> = columns.iter().map(|col| col[i]).collect();
        m.mean_rank = ranks.iter().sum::<usize>() as f64 / ranks.len() as f64;
        m.best_rank = ranks.iter().copied().min().unwrap_or(0);
    }
}

/// 1-based competition ranks, largest value first. Equal values share a rank.
fn rank_descending(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .map(|v| 1 + values.iter().filter(|other| *other > v).count())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(id: &str, perplexity: f64, u_mass: f64, c_npmi: f64) -> ModelMetrics {
        ModelMetrics {
            model_id: id.to_string(),
            alpha: 0.1,
            eta: 0.1,
            num_topics: 2,
            perplexity,
            u_mass,
            c_npmi,
            mean_rank: 0.0,
            best_rank: 0,
        }
    }

    #[test]
    fn test_rank_descending_with_ties() {
        assert_eq!(rank_descending(&[0.5, 0.9, 0.5, 0.1]), vec![2, 1, 2, 4]);
    }

    #[test]
    fn test_assign_ranks() {
        let mut metrics = vec![
            metric("a", 100.0, -1.0, 0.2),
            metric("b", 50.0, -2.0, 0.1),
        ];
        assign_ranks(&mut metrics);
        // a: perplexity 2, u_mass 1, npmi 1
        assert!((metrics[0].mean_rank - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(metrics[0].best_rank, 1);
        // b: perplexity 1, u_mass 2, npmi 2
        assert!((metrics[1].mean_rank - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(metrics[1].best_rank, 1);
    }

    #[test]
    fn test_default_grid_points() {
        let grid = ParameterGrid::default();
        assert_eq!(grid.len(), 64);
        let points = grid.points();
        assert_eq!(points[0], (0.01, 0.01, 5));
        assert_eq!(points[63], (10.0, 10.0, 20));
    }

    #[test]
    fn test_metrics_serialize_with_view_names() {
        let json = serde_json::to_value(metric("a", 1.0, 0.0, 0.0)).unwrap();
        assert_eq!(json["modelId"], "a");
        assert!(json.get("beta").is_some());
        assert!(json.get("eta").is_none());
    }
}
