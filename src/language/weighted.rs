use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use super::bank::{LanguageProvider, WordBank};
use crate::error::Result;

/// The one language whose word order is a frequency ranking.
pub const RANKED_LANGUAGE: &str = "en";

/// Running totals of rank weights, `cum[i] = sum(n - k for k in 0..=i)`.
///
/// Rank 0 weighs `n`, the last rank weighs 1, so common words are drawn
/// more often while rare ones are never excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeWeights(Vec<u64>);

impl CumulativeWeights {
    pub fn from_rank_count(n: usize) -> Self {
        let mut sum = 0u64;
        let cum = (0..n)
            .map(|i| {
                sum += (n - i) as u64;
                sum
            })
            .collect();
        Self(cum)
    }

    pub fn total(&self) -> u64 {
        self.0.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Smallest index `i` with `cum[i] >= r`. `r` is expected in `1..=total`.
    pub fn search(&self, r: u64) -> usize {
        self.0.partition_point(|&c| c < r)
    }
}

#[derive(Debug, Clone)]
enum Sampling {
    Ranked(CumulativeWeights),
    Uniform,
}

/// Draws practice words from a single word bank.
#[derive(Debug, Clone)]
pub struct WeightedWordSource {
    bank: WordBank,
    sampling: Sampling,
    rng: StdRng,
}

impl WeightedWordSource {
    pub fn new(bank: WordBank) -> Self {
        let sampling = if bank.code() == RANKED_LANGUAGE {
            Sampling::Ranked(CumulativeWeights::from_rank_count(bank.len()))
        } else {
            Sampling::Uniform
        };
        Self {
            bank,
            sampling,
            rng: StdRng::from_entropy(),
        }
    }

    /// Load `code` from `provider`, falling back to the ranked default if
    /// that fails. A failure of the default itself is returned as-is.
    pub fn from_provider<P>(provider: &mut P, code: &str) -> Result<Self>
    where
        P: LanguageProvider + ?Sized,
    {
        let bank = match provider.load_language(code) {
            Ok(bank) => bank,
            Err(err) if !code.eq_ignore_ascii_case(RANKED_LANGUAGE) => {
                warn!(language = code, error = %err, "language unavailable, falling back to default");
                provider.load_language(RANKED_LANGUAGE)?
            }
            Err(err) => return Err(err),
        };
        Ok(Self::new(bank))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    pub fn language(&self) -> &str {
        self.bank.code()
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self.sampling, Sampling::Ranked(_))
    }

    pub fn next_word(&mut self) -> String {
        let idx = match &self.sampling {
            Sampling::Ranked(weights) => {
                let r = self.rng.gen_range(1..=weights.total());
                weights.search(r)
            }
            Sampling::Uniform => self.rng.gen_range(0..self.bank.len()),
        };
        self.bank.words()[idx].clone()
    }

    pub fn sample(&mut self, n: usize) -> Vec<String> {
        (0..n).map(|_| self.next_word()).collect()
    }
}
