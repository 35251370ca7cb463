//! Filter banks: chains of correlation kernels loaded from text.
//!
//! Stages run in file order, each one consuming the previous stage's
//! output. Strided stages shrink the image, so later stages see the running
//! dimensions rather than the source size.

use std::path::Path;

use ndarray::{Array3, ArrayView3};
use tracing::{debug, trace};

use super::correlation::{correlate_padded, correlate_strided, StrideIndexing};
use super::kernel::{parse_filter_bank, FilterStage, Grammar};
use super::levels::histogram_expand;
use crate::error::FilterResult;

/// Step run on the result of the last stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostProcess {
    #[default]
    None,
    /// Stretch the result with [`histogram_expand`], as done for edge
    /// kernels whose responses cluster near zero.
    HistogramExpand,
}

/// How a filter bank is read and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterBankOptions {
    /// Classic banks run padded correlation, extended banks strided.
    pub grammar: Grammar,
    /// Output mapping for strided stages.
    pub indexing: StrideIndexing,
    pub post_process: PostProcess,
}

impl FilterBankOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn extended() -> Self {
        Self {
            grammar: Grammar::Extended,
            ..Self::default()
        }
    }

    pub fn with_indexing(mut self, indexing: StrideIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    pub fn with_post_process(mut self, post_process: PostProcess) -> Self {
        self.post_process = post_process;
        self
    }
}

/// Parsed filter bank ready to run on images.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    stages: Vec<FilterStage>,
    options: FilterBankOptions,
}

impl FilterBank {
    pub fn new(stages: Vec<FilterStage>, options: FilterBankOptions) -> Self {
        Self { stages, options }
    }

    /// Parse bank text using the grammar in `options`.
    pub fn parse(text: &str, options: FilterBankOptions) -> FilterResult<Self> {
        let stages = parse_filter_bank(text, options.grammar)?;
        Ok(Self::new(stages, options))
    }

    /// Read and parse a bank file.
    pub fn from_file(path: impl AsRef<Path>, options: FilterBankOptions) -> FilterResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading filter bank");
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, options)
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn options(&self) -> FilterBankOptions {
        self.options
    }

    /// Run every stage, then the configured post-processing.
    pub fn apply(&self, input: ArrayView3<u8>) -> FilterResult<Array3<u8>> {
        let filtered = apply_filter_bank(
            input,
            &self.stages,
            self.options.grammar,
            self.options.indexing,
        )?;

        match self.options.post_process {
            PostProcess::None => Ok(filtered),
            PostProcess::HistogramExpand => histogram_expand(filtered.view()),
        }
    }
}

/// Apply parsed stages in order.
///
/// Classic banks use padded correlation with each stage's offset; extended
/// banks use strided correlation with each stage's stride.
pub fn apply_filter_bank(
    input: ArrayView3<u8>,
    stages: &[FilterStage],
    grammar: Grammar,
    indexing: StrideIndexing,
) -> FilterResult<Array3<u8>> {
    let mut current = input.to_owned();

    for (idx, stage) in stages.iter().enumerate() {
        let (height, width, _) = current.dim();
        trace!(stage = idx, height, width, "applying filter stage");

        current = match grammar {
            Grammar::Classic => correlate_padded(current.view(), &stage.kernel, stage.offset)?,
            Grammar::Extended => correlate_strided(
                current.view(),
                &stage.kernel,
                stage.offset,
                stage.stride,
                indexing,
            )?,
        };
    }

    let (height, width, _) = current.dim();
    debug!(stages = stages.len(), height, width, "filter bank applied");
    Ok(current)
}
