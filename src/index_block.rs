//! Index blocks for structured-sparsity regularizers.
//!
//! A group of contiguous blocks partitioning `0..n` is flattened into the
//! boundary vector `[0, max_1, ..., max_k]` expected by group-lasso solvers
//! (the "SLEP index").

use log::debug;

/// Errors from building or validating index blocks
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexBlockError {
    #[error("Invalid index block {min}..{max}: min index exceeds max index")]
    InvalidRange { min: usize, max: usize },
    #[error("Index block group is empty")]
    Empty,
    #[error("Blocks do not cover the whole range: first block starts at {0}")]
    NotStartingAtZero(usize),
    #[error("Blocks are overlapped or do not cover the whole range: {prev_max} != {next_min}")]
    NotContiguous { prev_max: usize, next_min: usize },
}

/// Half-open index range `min_index..max_index` with a regularization weight.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexBlock {
    pub min_index: usize,
    pub max_index: usize,
    pub weight: f64,
}

impl IndexBlock {
    pub fn new(min_index: usize, max_index: usize) -> Result<Self, IndexBlockError> {
        if min_index > max_index {
            return Err(IndexBlockError::InvalidRange {
                min: min_index,
                max: max_index,
            });
        }
        Ok(Self {
            min_index,
            max_index,
            weight: 1.0,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn len(&self) -> usize {
        self.max_index - self.min_index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::str::FromStr for IndexBlock {
    type Err = String;

    /// Parses `min..max`, optionally followed by `:weight`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (range, weight) = match s.split_once(':') {
            Some((range, weight)) => (range, Some(weight)),
            None => (s, None),
        };
        let (min, max) = range
            .split_once("..")
            .ok_or_else(|| format!("Invalid block: '{}'. Expected 'min..max[:weight]'", s))?;
        let min = min
            .trim()
            .parse()
            .map_err(|e| format!("Invalid min index in '{}': {}", s, e))?;
        let max = max
            .trim()
            .parse()
            .map_err(|e| format!("Invalid max index in '{}': {}", s, e))?;

        let block = IndexBlock::new(min, max).map_err(|e| e.to_string())?;
        match weight {
            Some(w) => {
                let w = w
                    .trim()
                    .parse()
                    .map_err(|e| format!("Invalid weight in '{}': {}", s, e))?;
                Ok(block.with_weight(w))
            }
            None => Ok(block),
        }
    }
}

/// Flat group of index blocks.
#[derive(Debug, Clone, Default)]
pub struct IndexBlockGroup {
    blocks: Vec<IndexBlock>,
}

impl IndexBlockGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block(&mut self, block: IndexBlock) {
        self.blocks.push(block);
    }

    /// Remove the first block equal to `block`. Returns whether one was removed.
    pub fn remove_block(&mut self, block: &IndexBlock) -> bool {
        match self.blocks.iter().position(|b| b == block) {
            Some(pos) => {
                self.blocks.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn blocks(&self) -> &[IndexBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks ordered by `(min, max)`, checked to partition `0..max`.
    fn sorted_checked(&self) -> Result<Vec<&IndexBlock>, IndexBlockError> {
        let mut sorted: Vec<&IndexBlock> = self.blocks.iter().collect();
        sorted.sort_by_key(|b| (b.min_index, b.max_index));

        let first = sorted.first().ok_or(IndexBlockError::Empty)?;
        if first.min_index != 0 {
            return Err(IndexBlockError::NotStartingAtZero(first.min_index));
        }
        for pair in sorted.windows(2) {
            if pair[0].max_index != pair[1].min_index {
                return Err(IndexBlockError::NotContiguous {
                    prev_max: pair[0].max_index,
                    next_min: pair[1].min_index,
                });
            }
        }
        Ok(sorted)
    }

    /// Boundary vector `[0, max_1, ..., max_k]` of length `k + 1`.
    pub fn slep_ind(&self) -> Result<Vec<usize>, IndexBlockError> {
        let sorted = self.sorted_checked()?;
        debug!("Number of sub-blocks = {}", sorted.len());

        let mut ind = Vec::with_capacity(sorted.len() + 1);
        ind.push(0);
        ind.extend(sorted.iter().map(|b| b.max_index));
        Ok(ind)
    }

    /// Block weights in the same order as [`slep_ind`](Self::slep_ind).
    pub fn slep_weights(&self) -> Result<Vec<f64>, IndexBlockError> {
        Ok(self.sorted_checked()?.iter().map(|b| b.weight).collect())
    }
}

impl FromIterator<IndexBlock> for IndexBlockGroup {
    fn from_iter<I: IntoIterator<Item = IndexBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}
