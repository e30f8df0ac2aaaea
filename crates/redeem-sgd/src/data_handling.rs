//! Datasets of sparse labelled vectors.
//!
//! A `Dataset` is built once from raw rows and is read-only from
//! then on. Training and scoring borrow it, so one dataset can back any
//! number of concurrent training runs without locking.
use std::sync::OnceLock;

use crate::error::{LabelClass, Result, SgdError};
use crate::sparse::{SparseVector, BIAS_INDEX};

/// One raw input row: `(indices, values, label)`.
pub type Row = (Vec<usize>, Vec<f64>, f64);

/// Dataset positions split by the sign of their label.
///
/// Positive means `label > 0`; everything else (including a zero label) is
/// negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassIndex {
    pub positive: Vec<usize>,
    pub negative: Vec<usize>,
}

impl ClassIndex {
    fn from_vectors(vectors: &[SparseVector]) -> Self {
        let mut index = ClassIndex::default();
        for (position, vector) in vectors.iter().enumerate() {
            if vector.label() > 0.0 {
                index.positive.push(position);
            } else {
                index.negative.push(position);
            }
        }
        index
    }

    /// Fails with `DegenerateDataset` when either side is empty.
    pub fn require_both_classes(&self) -> Result<()> {
        if self.positive.is_empty() {
            return Err(SgdError::DegenerateDataset {
                missing: LabelClass::Positive,
            });
        }
        if self.negative.is_empty() {
            return Err(SgdError::DegenerateDataset {
                missing: LabelClass::Negative,
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Dataset {
    vectors: Vec<SparseVector>,
    dimensionality: usize,
    bias_term: bool,
    class_index: OnceLock<ClassIndex>,
}

impl Dataset {
    pub fn builder(dimensionality: usize) -> DatasetBuilder {
        DatasetBuilder::new(dimensionality)
    }

    /// Build a dataset from already validated vectors.
    ///
    /// Fails with `InvalidVector` if any vector has an index at or beyond
    /// `dimensionality`.
    pub fn from_vectors(vectors: Vec<SparseVector>, dimensionality: usize) -> Result<Self> {
        if dimensionality == 0 {
            return Err(SgdError::invalid_vector(0, "dimensionality must be at least 1"));
        }
        for (position, vector) in vectors.iter().enumerate() {
            if let Some(max) = vector.max_index() {
                if max >= dimensionality {
                    return Err(SgdError::invalid_vector(
                        position,
                        format!(
                            "index {} out of range for dimensionality {}",
                            max, dimensionality
                        ),
                    ));
                }
            }
        }
        Ok(Self {
            vectors,
            dimensionality,
            bias_term: false,
            class_index: OnceLock::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Whether every vector carries the implicit bias feature at index 0.
    pub fn has_bias_term(&self) -> bool {
        self.bias_term
    }

    pub fn get(&self, position: usize) -> Option<&SparseVector> {
        self.vectors.get(position)
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SparseVector> {
        self.vectors.iter()
    }

    pub fn labels(&self) -> Vec<f64> {
        self.vectors.iter().map(|v| v.label()).collect()
    }

    /// Class partition, computed on first use.
    pub fn class_index(&self) -> &ClassIndex {
        self.class_index
            .get_or_init(|| ClassIndex::from_vectors(&self.vectors))
    }

    pub fn count_positive(&self) -> usize {
        self.class_index().positive.len()
    }

    pub fn count_negative(&self) -> usize {
        self.class_index().negative.len()
    }

    /// Mean number of stored features per vector.
    pub fn mean_nnz(&self) -> f64 {
        if self.vectors.is_empty() {
            return 0.0;
        }
        let total: usize = self.vectors.iter().map(|v| v.nnz()).sum();
        total as f64 / self.vectors.len() as f64
    }

    pub fn log_summary(&self) {
        log::info!(
            "Dataset: {} vectors ({} positive, {} negative), dimensionality {}, mean nnz {:.2}{}",
            self.len(),
            self.count_positive(),
            self.count_negative(),
            self.dimensionality,
            self.mean_nnz(),
            if self.bias_term { ", with bias term" } else { "" }
        );
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a SparseVector;
    type IntoIter = std::slice::Iter<'a, SparseVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

/// Incremental dataset construction.
///
/// Rows are validated as they are pushed so the reported position is the
/// row's position in the input.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    vectors: Vec<SparseVector>,
    dimensionality: usize,
    bias_term: bool,
}

impl DatasetBuilder {
    pub fn new(dimensionality: usize) -> Self {
        Self {
            vectors: Vec::new(),
            dimensionality,
            bias_term: false,
        }
    }

    /// Reserve index 0 for an implicit bias feature of value 1.0.
    ///
    /// Must be set before any row is pushed; rows that use index 0 are then
    /// rejected.
    pub fn with_bias_term(mut self, bias_term: bool) -> Self {
        self.bias_term = bias_term;
        self
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn push_row(
        &mut self,
        indices: Vec<usize>,
        values: Vec<f64>,
        label: f64,
    ) -> Result<&mut Self> {
        let position = self.vectors.len();
        if self.dimensionality == 0 {
            return Err(SgdError::invalid_vector(
                position,
                "dimensionality must be at least 1",
            ));
        }
        if self.bias_term && indices.first() == Some(&BIAS_INDEX) {
            return Err(SgdError::invalid_vector(
                position,
                "index 0 is reserved for the bias term",
            ));
        }
        let vector = SparseVector::checked(indices, values, label, self.dimensionality)
            .map_err(|reason| SgdError::invalid_vector(position, reason))?;
        let vector = if self.bias_term {
            vector.with_bias_term()
        } else {
            vector
        };
        self.vectors.push(vector);
        Ok(self)
    }

    /// Push a dense row; zero entries are dropped.
    pub fn push_dense_row(&mut self, row: &[f64], label: f64) -> Result<&mut Self> {
        let offset = usize::from(self.bias_term);
        let (indices, values) = row
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i + offset, *v))
            .unzip();
        self.push_row(indices, values, label)
    }

    pub fn extend_rows<I>(&mut self, rows: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Row>,
    {
        for (indices, values, label) in rows {
            self.push_row(indices, values, label)?;
        }
        Ok(self)
    }

    pub fn build(self) -> Dataset {
        Dataset {
            vectors: self.vectors,
            dimensionality: self.dimensionality,
            bias_term: self.bias_term,
            class_index: OnceLock::new(),
        }
    }
}

/// Validate `rows` and collect them into a [`Dataset`].
///
/// Fails with `InvalidVector` on the first malformed row.
pub fn build_dataset<I>(rows: I, dimensionality: usize) -> Result<Dataset>
where
    I: IntoIterator<Item = Row>,
{
    let mut builder = DatasetBuilder::new(dimensionality);
    builder.extend_rows(rows)?;
    Ok(builder.build())
}
