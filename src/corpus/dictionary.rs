// Dictionary: the bidirectional term <-> id mapping behind every corpus.
//
// Ids are handed out in first-occurrence order across the documents, so the
// same input always produces the same ids. Pruning drops entries and then
// compacts the remaining ids, keeping their relative order.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::BowDocument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    token2id: HashMap<String, usize>,
    id2token: Vec<String>,
    /// Number of documents each id appears in
    dfs: Vec<u32>,
    /// Number of documents processed
    num_docs: usize,
    /// Number of tokens processed, including repeats
    num_pos: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from tokenized documents.
    pub fn from_documents<D, S>(documents: &[D]) -> Self
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new();
        dictionary.add_documents(documents);
        dictionary
    }

    /// Add documents, assigning new ids to unseen tokens in order of
    /// first appearance and updating document frequencies.
    pub fn add_documents<D, S>(&mut self, documents: &[D])
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        for document in documents {
            let tokens = document.as_ref();
            let mut seen: HashSet<usize> = HashSet::new();

            for token in tokens {
                let token = token.as_ref();
                let id = match self.token2id.get(token) {
                    Some(&id) => id,
                    None => {
                        let id = self.id2token.len();
                        self.token2id.insert(token.to_string(), id);
                        self.id2token.push(token.to_string());
                        self.dfs.push(0);
                        id
                    }
                };
                if seen.insert(id) {
                    self.dfs[id] += 1;
                }
            }

            self.num_docs += 1;
            self.num_pos += tokens.len();
        }
    }

    /// Convert tokens into a bag-of-words sorted by term id. Tokens that
    /// aren't in the dictionary are skipped.
    pub fn doc2bow<S: AsRef<str>>(&self, tokens: &[S]) -> BowDocument {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in tokens {
            if let Some(&id) = self.token2id.get(token.as_ref()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.token2id.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.id2token.get(id).map(String::as_str)
    }

    pub fn token2id(&self) -> &HashMap<String, usize> {
        &self.token2id
    }

    /// Tokens indexed by id.
    pub fn id2token(&self) -> &[String] {
        &self.id2token
    }

    pub fn doc_freq(&self, id: usize) -> Option<u32> {
        self.dfs.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.id2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2token.is_empty()
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn num_pos(&self) -> usize {
        self.num_pos
    }

    /// (id, token) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.id2token.iter().map(String::as_str).enumerate()
    }

    /// Drop terms that appear in fewer than `min_count` documents.
    pub fn filter_below(&mut self, min_count: u32) {
        self.retain(|_, df| df >= min_count);
    }

    /// Drop rare and overly common terms.
    ///
    /// Keeps terms in at least `no_below` documents and in at most
    /// `no_above` (a fraction of all documents) of them. With `keep_n`, only
    /// the `keep_n` most frequent survivors stay; ties go to the lower id.
    pub fn filter_extremes(
        &mut self,
        no_below: u32,
        no_above: f64,
        keep_n: Option<usize>,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&no_above) {
            anyhow::bail!("no_above must be a fraction between 0 and 1, got {no_above}");
        }

        let no_above_abs = (no_above * self.num_docs as f64) as u32;
        let mut good: Vec<usize> = (0..self.len())
            .filter(|&id| self.dfs[id] >= no_below && self.dfs[id] <= no_above_abs)
            .collect();

        if let Some(keep_n) = keep_n {
            // Stable sort: equal frequencies stay in id order
            good.sort_by(|&a, &b| self.dfs[b].cmp(&self.dfs[a]));
            good.truncate(keep_n);
        }

        let keep: HashSet<usize> = good.into_iter().collect();
        self.retain(|id, _| keep.contains(&id));
        Ok(())
    }

    /// Keep entries for which `keep(id, doc_freq)` holds, then compact ids.
    fn retain(&mut self, keep: impl Fn(usize, u32) -> bool) {
        let tokens = std::mem::take(&mut self.id2token);
        let dfs = std::mem::take(&mut self.dfs);
        self.token2id.clear();

        for (old_id, (token, df)) in tokens.into_iter().zip(dfs).enumerate() {
            if keep(old_id, df) {
                let id = self.id2token.len();
                self.token2id.insert(token.clone(), id);
                self.id2token.push(token);
                self.dfs.push(df);
            }
        }
    }
}
