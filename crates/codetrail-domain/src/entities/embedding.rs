//! Embedding entity — a deterministic keyword-frequency vector over a
//! symbol's description.

use serde::{Deserialize, Serialize};

use super::file_record::FileId;
use super::symbol::SymbolId;

/// A keyword-frequency vector indexed against a single symbol's description.
///
/// Unlike a neural embedding, this vector is fully deterministic: the same
/// description always yields the same vector, and the dimensions correspond
/// one-to-one to a fixed, closed keyword vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Symbol this vector was computed for.
    pub symbol_id: SymbolId,
    /// File the symbol belongs to, denormalized for query-time filtering.
    pub file_id: FileId,
    /// Human-readable description the vector was computed from (name,
    /// detail, kind and surrounding doc comment, when available).
    pub description: String,
    /// Keyword-frequency vector; dimension equals the vocabulary size.
    pub vector: Vec<f32>,
    /// Source lines `[start-2, end+2]` around the symbol, clamped to the
    /// file's bounds, for display alongside a search hit.
    pub code_snippet: Option<String>,
}

impl Embedding {
    /// Construct an embedding from its computed vector.
    #[must_use]
    pub fn new(
        symbol_id: SymbolId,
        file_id: FileId,
        description: impl Into<String>,
        vector: Vec<f32>,
        code_snippet: Option<String>,
    ) -> Self {
        Self {
            symbol_id,
            file_id,
            description: description.into(),
            vector,
            code_snippet,
        }
    }

    /// Cosine similarity against another vector of equal dimension.
    ///
    /// Returns `0.0` for a zero-magnitude vector (no recognized keywords)
    /// rather than producing `NaN`.
    #[must_use]
    pub fn cosine_similarity(&self, other: &[f32]) -> f32 {
        debug_assert_eq!(self.vector.len(), other.len());
        let dot: f32 = self.vector.iter().zip(other).map(|(a, b)| a * b).sum();
        let mag_a: f32 = self.vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        let mag_b: f32 = other.iter().map(|v| v * v).sum::<f32>().sqrt();
        if mag_a == 0.0 || mag_b == 0.0 {
            return 0.0;
        }
        dot / (mag_a * mag_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::file_record::FileId;
    use crate::entities::symbol::SymbolId;

    fn sample(vector: Vec<f32>) -> Embedding {
        Embedding::new(
            SymbolId::from_name("sym"),
            FileId::from_name("file"),
            "description",
            vector,
            None,
        )
    }

    #[test]
    fn identical_vectors_have_similarity_one() {
        let a = sample(vec![1.0, 2.0, 0.0]);
        assert!((a.cosine_similarity(&[1.0, 2.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        let a = sample(vec![1.0, 0.0]);
        assert!(a.cosine_similarity(&[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn zero_magnitude_vector_never_produces_nan() {
        let a = sample(vec![0.0, 0.0]);
        assert_eq!(a.cosine_similarity(&[0.0, 0.0]), 0.0);
    }
}
