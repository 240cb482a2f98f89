//! # Tokenizer output normalization
//!
//! Tokenizers may return the encoding of a single input either as a flat sequence of ids or
//! already wrapped in a batch dimension. `EncodedResult` makes both shapes explicit and
//! `EncodedResult::normalize` converts either of them into the canonical `EncodedBatch` consumed
//! by the generation step.

use crate::common::error::TranslatorError;
use tch::{Device, Tensor};

/// # Raw tokenizer output, with or without a batch dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedResult {
    /// Ids and attention mask for a batch of inputs (`[batch, sequence_length]`)
    Batched {
        input_ids: Vec<Vec<i64>>,
        attention_mask: Vec<Vec<i64>>,
    },
    /// Ids and attention mask for a single input (`[sequence_length]`)
    Unbatched {
        input_ids: Vec<i64>,
        attention_mask: Vec<i64>,
    },
}

/// # Canonical batched encoding
/// Every row of `input_ids` has the same length as the matching row of `attention_mask`, and all
/// rows share the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    pub input_ids: Vec<Vec<i64>>,
    pub attention_mask: Vec<Vec<i64>>,
}

impl EncodedResult {
    /// Creates an unbatched encoding attending to every token.
    pub fn from_ids(input_ids: Vec<i64>) -> EncodedResult {
        let attention_mask = vec![1; input_ids.len()];
        EncodedResult::Unbatched {
            input_ids,
            attention_mask,
        }
    }

    pub fn is_batched(&self) -> bool {
        matches!(self, EncodedResult::Batched { .. })
    }

    /// Converts the tokenizer output into a batch.
    ///
    /// An unbatched encoding of length `L` becomes a single-row batch of shape `[1, L]`, element
    /// order preserved. A batched encoding is returned unchanged when its rows already share a
    /// common length, and right-padded otherwise (`pad_id` for the ids, `0` for the mask).
    ///
    /// # Arguments
    ///
    /// * `pad_id` - padding token id used to align rows of different lengths
    ///
    /// # Returns
    ///
    /// * `EncodedBatch` canonical encoding
    ///
    /// # Errors
    ///
    /// * `TranslatorError::ValueError` if an attention mask does not match its ids length, or if a
    /// batched encoding contains no row.
    ///
    /// # Example
    ///
    /// ```
    /// use nllb_translator::pipelines::encoding::EncodedResult;
    /// # fn main() -> Result<(), nllb_translator::TranslatorError> {
    /// let encoded = EncodedResult::from_ids(vec![256098, 1034, 2]);
    /// let batch = encoded.normalize(1)?;
    /// assert_eq!(batch.input_ids, vec![vec![256098, 1034, 2]]);
    /// assert_eq!(batch.attention_mask, vec![vec![1, 1, 1]]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn normalize(self, pad_id: i64) -> Result<EncodedBatch, TranslatorError> {
        let (input_ids, attention_mask) = match self {
            EncodedResult::Unbatched {
                input_ids,
                attention_mask,
            } => (vec![input_ids], vec![attention_mask]),
            EncodedResult::Batched {
                input_ids,
                attention_mask,
            } => (input_ids, attention_mask),
        };

        if input_ids.is_empty() {
            return Err(TranslatorError::ValueError(
                "tokenizer returned an empty batch".to_string(),
            ));
        }
        if input_ids.len() != attention_mask.len() {
            return Err(TranslatorError::ValueError(format!(
                "batch has {} id rows but {} attention mask rows",
                input_ids.len(),
                attention_mask.len()
            )));
        }
        for (row, (ids, mask)) in input_ids.iter().zip(attention_mask.iter()).enumerate() {
            if ids.len() != mask.len() {
                return Err(TranslatorError::ValueError(format!(
                    "row {}: attention mask length {} differs from input ids length {}",
                    row,
                    mask.len(),
                    ids.len()
                )));
            }
        }

        let max_len = input_ids.iter().map(Vec::len).max().unwrap_or(0);
        if input_ids.iter().all(|ids| ids.len() == max_len) {
            return Ok(EncodedBatch {
                input_ids,
                attention_mask,
            });
        }

        let input_ids = input_ids
            .into_iter()
            .map(|mut ids| {
                ids.resize(max_len, pad_id);
                ids
            })
            .collect();
        let attention_mask = attention_mask
            .into_iter()
            .map(|mut mask| {
                mask.resize(max_len, 0);
                mask
            })
            .collect();
        Ok(EncodedBatch {
            input_ids,
            attention_mask,
        })
    }
}

impl EncodedBatch {
    pub fn batch_size(&self) -> usize {
        self.input_ids.len()
    }

    pub fn sequence_length(&self) -> usize {
        self.input_ids.first().map_or(0, Vec::len)
    }

    /// Builds the `[batch, sequence_length]` input ids and attention mask tensors on `device`.
    pub fn to_tensors(&self, device: Device) -> (Tensor, Tensor) {
        (
            stack_rows(&self.input_ids, device),
            stack_rows(&self.attention_mask, device),
        )
    }
}

fn stack_rows(rows: &[Vec<i64>], device: Device) -> Tensor {
    let rows = rows
        .iter()
        .map(|row| Tensor::from_slice(row.as_slice()))
        .collect::<Vec<_>>();
    Tensor::stack(&rows, 0).to(device)
}
