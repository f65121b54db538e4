//! Read-only lookup tables backing the feature encoders and the ranking
//! engine.
//!
//! All tables are loaded once during warm-up and shared immutably for the
//! life of the process. Lookup misses are never errors: an absent encoding
//! key resolves to `0.0` and an absent label resolves to
//! [`UNKNOWN_LABEL`](crate::constants::UNKNOWN_LABEL) at the call site.
//! Load failures, by contrast, are fatal at boot (see [`crate::boot`]).

pub mod error;
pub mod loader;


pub use error::TableError;
pub use loader::{
    load_membership, load_nested_encoding, load_nested_mapping, load_paired_encoding, load_scaler,
};

use std::collections::HashMap;

use tracing::debug;

/// Learned `{code → f32}` encoding for one categorical feature.
///
/// Keys are case-sensitive after trimming. Looking up an absent key yields
/// `0.0`, never an error; the miss is logged so operators can watch the
/// fallback rate.
#[derive(Debug, Clone, Default)]
pub struct EncodingTable {
    entries: HashMap<String, f32>,
}

impl EncodingTable {
    /// Builds a table from `(code, value)` pairs. Later duplicates of a code
    /// are ignored, matching the original table-construction behavior.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let mut entries = HashMap::new();
        for (code, value) in pairs {
            entries.entry(code.into()).or_insert(value);
        }
        Self { entries }
    }

    /// An empty table: every lookup resolves to the default `0.0`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolves `code` to its learned value, trimming surrounding
    /// whitespace first. Absent or empty codes resolve to `0.0`.
    pub fn encode(&self, code: &str) -> f32 {
        let code = code.trim();
        if code.is_empty() {
            return 0.0;
        }

        match self.entries.get(code) {
            Some(value) => *value,
            None => {
                debug!(code = %code, "encoding miss, defaulting to 0.0");
                0.0
            }
        }
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mean/scale pair standardizing one continuous feature.
#[derive(Debug, Clone, Copy)]
pub struct Scaler {
    pub mean: f32,
    pub scale: f32,
}

impl Scaler {
    pub fn new(mean: f32, scale: f32) -> Self {
        Self { mean, scale }
    }

    /// The no-op scaler used in stub mode.
    pub fn identity() -> Self {
        Self {
            mean: 0.0,
            scale: 1.0,
        }
    }

    /// `(x - mean) / scale`. `scale != 0` is validated at load time.
    pub fn normalize(&self, x: f32) -> f32 {
        (x - self.mean) / self.scale
    }
}

/// Bidirectional index↔label correspondence for one artifact's output space.
///
/// The inverse (label → index) is built eagerly at construction and two
/// labels sharing one index fail the build, so reverse lookup never depends
/// on scan order.
#[derive(Debug, Clone, Default)]
pub struct LabelMapping {
    forward: HashMap<u32, String>,
    inverse: HashMap<String, u32>,
}

impl LabelMapping {
    /// Builds a mapping from `(label, index)` pairs, validating that no two
    /// labels collide on the same index.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut forward: HashMap<u32, String> = HashMap::new();
        let mut inverse: HashMap<String, u32> = HashMap::new();

        for (label, index) in pairs {
            let label = label.into();
            if let Some(existing) = forward.get(&index) {
                return Err(TableError::IndexCollision {
                    first: existing.clone(),
                    second: label,
                    index,
                });
            }
            forward.insert(index, label.clone());
            inverse.insert(label, index);
        }

        Ok(Self { forward, inverse })
    }

    /// An empty mapping: every forward lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Label for a model output index, if the mapping knows it.
    pub fn label_for(&self, index: u32) -> Option<&str> {
        self.forward.get(&index).map(String::as_str)
    }

    /// Model output index for a label, if the mapping knows it.
    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.inverse.get(label).copied()
    }

    /// Number of labels in the mapping.
    pub fn space_size(&self) -> usize {
        self.forward.len()
    }

    /// Width of the index space: one past the highest forward index.
    /// Indices may be sparse, so this can exceed [`space_size`]. It is the
    /// width of one-hot distributions reconstructed from index-shaped
    /// artifact output.
    ///
    /// [`space_size`]: LabelMapping::space_size
    pub fn index_space(&self) -> usize {
        self.forward.keys().max().map_or(0, |&i| i as usize + 1)
    }

    /// Returns `true` if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// `{category label → ordered candidate procedure labels}`.
///
/// Candidate order is preserved from the source file; it is the tie-break
/// order of stage-2 ranking.
#[derive(Debug, Clone, Default)]
pub struct MembershipTable {
    entries: HashMap<String, Vec<String>>,
}

impl MembershipTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(category, procedures)| (category.into(), procedures))
                .collect(),
        }
    }

    /// An empty table: every category resolves to "no candidates".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Candidate procedures for a category, in table order. `None` and an
    /// empty slice both mean "no candidates".
    pub fn candidates(&self, category: &str) -> Option<&[String]> {
        self.entries.get(category).map(Vec::as_slice)
    }

    /// Number of categories with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
