//! Correlation kernels and the filter-bank text format.
//!
//! A filter bank is a list of kernels applied one after another. Its text
//! form groups lines into blocks separated by blank lines, one block per
//! kernel:
//!
//! ```text
//! 1, 1
//! 1/9 1/9 1/9
//! 1/9 1/9 1/9
//! 1/9 1/9 1/9
//! ```
//!
//! The classic grammar starts every block with an `r, c` offset line. The
//! extended grammar puts a bare integer `stride + 1` line in front of the
//! offset line. Kernel rows hold whitespace-separated coefficients, either
//! plain numbers or integer ratios `p/q`.

use ndarray::Array2;
use tracing::debug;

use crate::error::{FilterError, FilterResult};

// ============================================================================
// Kernel
// ============================================================================

/// Rectangular grid of correlation weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Wrap a weight grid. Both dimensions must be positive.
    pub fn new(weights: Array2<f64>) -> FilterResult<Self> {
        let (rows, cols) = weights.dim();
        if rows == 0 || cols == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be positive, got {rows}x{cols}"
            )));
        }
        Ok(Self { weights })
    }

    /// Build a kernel from row vectors, which must all have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> FilterResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(FilterError::InvalidKernel("kernel rows differ in length".into()));
        }
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        let weights = Array2::from_shape_vec((rows.len(), cols), data)
            .map_err(|e| FilterError::InvalidKernel(e.to_string()))?;
        Self::new(weights)
    }

    /// All-ones kernel. Only its geometry matters for the median filter.
    pub fn ones(rows: usize, cols: usize) -> FilterResult<Self> {
        Self::new(Array2::ones((rows, cols)))
    }

    /// Averaging kernel whose weights sum to one.
    pub fn box_filter(rows: usize, cols: usize) -> FilterResult<Self> {
        let weight = 1.0 / (rows * cols).max(1) as f64;
        Self::new(Array2::from_elem((rows, cols), weight))
    }

    /// Sobel kernel responding to horizontal intensity changes.
    pub fn sobel_horizontal() -> Self {
        Self {
            weights: ndarray::arr2(&[[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]),
        }
    }

    /// Sobel kernel responding to vertical intensity changes.
    pub fn sobel_vertical() -> Self {
        Self {
            weights: ndarray::arr2(&[[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]]),
        }
    }

    pub fn rows(&self) -> usize {
        self.weights.nrows()
    }

    pub fn cols(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }
}

// ============================================================================
// Coefficients
// ============================================================================

/// One parsed kernel token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coefficient {
    /// Plain number such as `-2` or `0.25`.
    Literal(f64),
    /// Integer ratio `p/q`.
    Ratio(i64, i64),
}

impl Coefficient {
    /// Parse a single token. Returns a human readable reason on failure.
    pub fn parse(token: &str) -> Result<Self, String> {
        match token.split_once('/') {
            Some((num, den)) => {
                let num: i64 = num
                    .trim()
                    .parse()
                    .map_err(|_| format!("ratio numerator '{num}' is not an integer"))?;
                let den: i64 = den
                    .trim()
                    .parse()
                    .map_err(|_| format!("ratio denominator '{den}' is not an integer"))?;
                if den == 0 {
                    return Err(format!("ratio '{token}' has a zero denominator"));
                }
                Ok(Coefficient::Ratio(num, den))
            }
            None => token
                .parse::<f64>()
                .map(Coefficient::Literal)
                .map_err(|_| format!("coefficient '{token}' is not a number")),
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Coefficient::Literal(v) => v,
            Coefficient::Ratio(p, q) => p as f64 / q as f64,
        }
    }
}

// ============================================================================
// Filter Bank Parsing
// ============================================================================

/// Layout of a filter-bank block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grammar {
    /// Offset line, then kernel rows.
    #[default]
    Classic,
    /// `stride + 1` line, offset line, then kernel rows.
    Extended,
}

/// One kernel of a filter bank with its placement parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    pub kernel: Kernel,
    /// (row, col) shift applied to padded correlation output.
    pub offset: (isize, isize),
    /// Cells skipped between window positions; 0 slides densely.
    pub stride: usize,
}

/// Parse filter-bank text into stages, in file order.
///
/// The whole text is rejected on the first malformed line; no partial list
/// is returned. Classic blocks always get a stride of 0.
pub fn parse_filter_bank(text: &str, grammar: Grammar) -> FilterResult<Vec<FilterStage>> {
    let stages = split_blocks(text)
        .into_iter()
        .map(|block| parse_block(&block, grammar))
        .collect::<FilterResult<Vec<_>>>()?;

    if stages.is_empty() {
        return Err(FilterError::Format {
            line: 1,
            reason: "filter bank holds no kernels".into(),
        });
    }

    debug!(stages = stages.len(), ?grammar, "parsed filter bank");
    Ok(stages)
}

/// Non-blank lines grouped by blank separators, paired with 1-based line numbers.
fn split_blocks(text: &str) -> Vec<Vec<(usize, &str)>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((idx + 1, line));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(block: &[(usize, &str)], grammar: Grammar) -> FilterResult<FilterStage> {
    let mut lines = block.iter().copied();

    let first_line = block.first().map_or(0, |(n, _)| *n);

    let stride = match grammar {
        Grammar::Classic => 0,
        Grammar::Extended => {
            let (line, text) = lines.next().ok_or_else(|| FilterError::Format {
                line: first_line,
                reason: "block ends before its stride line".into(),
            })?;
            parse_stride(line, text)?
        }
    };

    let (line, text) = lines.next().ok_or_else(|| FilterError::Format {
        line: first_line,
        reason: "block ends before its offset line".into(),
    })?;
    let offset = parse_offset(line, text)?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line, text) in lines {
        let row = text
            .split_whitespace()
            .map(|token| {
                Coefficient::parse(token)
                    .map(Coefficient::value)
                    .map_err(|reason| FilterError::Format { line, reason })
            })
            .collect::<FilterResult<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(FilterError::Format {
                    line,
                    reason: format!(
                        "kernel row has {} columns, expected {}",
                        row.len(),
                        first.len()
                    ),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(FilterError::Format {
            line: first_line,
            reason: "block has no kernel rows".into(),
        });
    }

    let kernel = Kernel::from_rows(&rows).map_err(|e| FilterError::Format {
        line: first_line,
        reason: e.to_string(),
    })?;

    Ok(FilterStage { kernel, offset, stride })
}

fn parse_stride(line: usize, text: &str) -> FilterResult<usize> {
    let step: usize = text.parse().map_err(|_| FilterError::Format {
        line,
        reason: format!("stride line '{text}' is not a non-negative integer"),
    })?;
    if step == 0 {
        return Err(FilterError::Format {
            line,
            reason: "stride line holds stride + 1 and must be at least 1".into(),
        });
    }
    Ok(step - 1)
}

fn parse_offset(line: usize, text: &str) -> FilterResult<(isize, isize)> {
    let bad = || FilterError::Format {
        line,
        reason: format!("offset line '{text}' is not of the form 'r, c'"),
    };
    let (r, c) = text.split_once(',').ok_or_else(bad)?;
    let r = r.trim().parse().map_err(|_| bad())?;
    let c = c.trim().parse().map_err(|_| bad())?;
    Ok((r, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const BOX_3X3: &str = "1, 1\n1/9 1/9 1/9\n1/9 1/9 1/9\n1/9 1/9 1/9\n";

    #[test]
    fn test_parse_rational_token() {
        let c = Coefficient::parse("1/9").unwrap();
        assert_eq!(c, Coefficient::Ratio(1, 9));
        assert_abs_diff_eq!(c.value(), 0.111_111_111_111, epsilon = 1e-9);
        assert_eq!(Coefficient::parse("-2").unwrap().value(), -2.0);
        assert_eq!(Coefficient::parse("0.25").unwrap(), Coefficient::Literal(0.25));
    }

    #[test]
    fn test_parse_bad_tokens() {
        assert!(Coefficient::parse("1.5/2").is_err());
        assert!(Coefficient::parse("1/x").is_err());
        assert!(Coefficient::parse("1/0").is_err());
        assert!(Coefficient::parse("abc").is_err());
    }

    #[test]
    fn test_parse_classic_box() {
        let stages = parse_filter_bank(BOX_3X3, Grammar::Classic).unwrap();

        assert_eq!(stages.len(), 1);
        let stage = &stages[0];
        assert_eq!(stage.offset, (1, 1));
        assert_eq!(stage.stride, 0);
        assert_eq!((stage.kernel.rows(), stage.kernel.cols()), (3, 3));
        assert_abs_diff_eq!(stage.kernel.weights()[[2, 2]], 1.0 / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_classic_chain_keeps_order() {
        let text = "0, 5\n1/11 1/11 1/11 1/11 1/11 1/11 1/11 1/11 1/11 1/11 1/11\n\n\
                    5, 0\n1/11\n1/11\n1/11\n1/11\n1/11\n1/11\n1/11\n1/11\n1/11\n1/11\n1/11\n";

        let stages = parse_filter_bank(text, Grammar::Classic).unwrap();

        assert_eq!(stages.len(), 2);
        assert_eq!((stages[0].kernel.rows(), stages[0].kernel.cols()), (1, 11));
        assert_eq!(stages[0].offset, (0, 5));
        assert_eq!((stages[1].kernel.rows(), stages[1].kernel.cols()), (11, 1));
        assert_eq!(stages[1].offset, (5, 0));
    }

    #[test]
    fn test_parse_extended_strides() {
        let text = "2\n1, 1\n-1 0 1\n-2 0 2\n-1 0 1\n\n1\n0, 0\n1\n";

        let stages = parse_filter_bank(text, Grammar::Extended).unwrap();

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].stride, 1);
        assert_eq!(stages[0].kernel, Kernel::sobel_horizontal());
        assert_eq!(stages[1].stride, 0);
        assert_eq!(stages[1].offset, (0, 0));
    }

    #[test]
    fn test_parse_tolerates_crlf_and_extra_blank_lines() {
        let text = "\r\n1, 1\r\n1 2\r\n3 4\r\n\r\n\r\n0, 0\r\n5\r\n\r\n";

        let stages = parse_filter_bank(text, Grammar::Classic).unwrap();

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].kernel.weights()[[1, 0]], 3.0);
        assert_eq!(stages[1].kernel.weights()[[0, 0]], 5.0);
    }

    #[test]
    fn test_parse_ragged_rows_fails() {
        let err = parse_filter_bank("1, 1\n1 1 1\n1 1\n", Grammar::Classic).unwrap_err();
        assert!(matches!(err, FilterError::Format { line: 3, .. }));
    }

    #[test]
    fn test_parse_bad_offset_fails() {
        assert!(matches!(
            parse_filter_bank("1 1\n1 1\n", Grammar::Classic),
            Err(FilterError::Format { line: 1, .. })
        ));
        assert!(parse_filter_bank("a, 1\n1\n", Grammar::Classic).is_err());
    }

    #[test]
    fn test_parse_bad_stride_fails() {
        assert!(parse_filter_bank("x\n1, 1\n1\n", Grammar::Extended).is_err());
        assert!(parse_filter_bank("0\n1, 1\n1\n", Grammar::Extended).is_err());
    }

    #[test]
    fn test_parse_bad_rational_reports_line() {
        let text = "1, 1\n1 1\n\n0, 0\n1/2 1.5/3\n";
        let err = parse_filter_bank(text, Grammar::Classic).unwrap_err();
        assert!(matches!(err, FilterError::Format { line: 5, .. }));
    }

    #[test]
    fn test_parse_block_without_rows_fails() {
        assert!(parse_filter_bank("1, 1\n", Grammar::Classic).is_err());
        assert!(parse_filter_bank("", Grammar::Classic).is_err());
    }

    #[test]
    fn test_parse_block_missing_metadata_lines() {
        let err = parse_block(&[], Grammar::Extended).unwrap_err();
        assert!(matches!(err, FilterError::Format { line: 0, .. }));

        // stride present, offset missing
        let err = parse_filter_bank("2\n", Grammar::Extended).unwrap_err();
        assert!(matches!(err, FilterError::Format { line: 1, .. }));
    }

    #[test]
    fn test_kernel_constructors() {
        assert!(Kernel::new(Array2::zeros((0, 3))).is_err());
        assert!(Kernel::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());

        let k = Kernel::box_filter(1, 11).unwrap();
        assert_eq!((k.rows(), k.cols()), (1, 11));
        assert_abs_diff_eq!(k.weights().sum(), 1.0, epsilon = 1e-12);

        let k = Kernel::ones(3, 5).unwrap();
        assert_eq!(k.weights().sum(), 15.0);
    }
}
