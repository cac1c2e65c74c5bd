//! Fee normalization of decoded JSON responses.
//!
//! # Data Flow
//! ```text
//! backend JSON body
//!     → serde_json::Value (decoded by the relay)
//!     → Normalizer::normalize (depth-first walk, in place)
//!         → fee.rs (heuristic + defaulting, per object)
//!     → re-encoded by the relay
//! ```
//!
//! # Design Decisions
//! - The fee check on an object runs before its children are visited, so a
//!   freshly inserted `fee` object is only ever seen as a plain descendant
//! - Arrays are walked element-wise, nested arrays included
//! - Mutations made before a failure stay in the tree; the caller decides
//!   whether to deliver it

pub mod fee;

use serde_json::Value;
use thiserror::Error;

pub use fee::{ensure_fee, looks_like_transaction, FeePatch, TRANSACTION_KEYS};

/// Errors raised while walking a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("JSON nesting exceeds the normalizer depth limit of {max_depth}")]
    DepthExceeded { max_depth: usize },
}

/// Counts of the objects a pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Objects that received a whole `{"amount": 0}` fee.
    pub inserted: usize,
    /// Fee objects that received a missing `amount`.
    pub completed: usize,
}

impl NormalizeReport {
    /// Total number of transactions patched.
    pub fn patched(&self) -> usize {
        self.inserted + self.completed
    }
}

/// Depth-first fee normalizer.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    max_depth: usize,
}

impl Normalizer {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Normalize `value` in place.
    ///
    /// On error the value keeps every change made before the walk stopped.
    pub fn normalize(&self, value: &mut Value) -> Result<NormalizeReport, NormalizeError> {
        let mut report = NormalizeReport::default();
        self.walk(value, 1, &mut report)?;
        Ok(report)
    }

    fn walk(
        &self,
        value: &mut Value,
        depth: usize,
        report: &mut NormalizeReport,
    ) -> Result<(), NormalizeError> {
        match value {
            Value::Object(object) => {
                self.check_depth(depth)?;
                if looks_like_transaction(object) {
                    match ensure_fee(object) {
                        FeePatch::Inserted => report.inserted += 1,
                        FeePatch::Completed => report.completed += 1,
                        FeePatch::Untouched => {}
                    }
                }
                for child in object.values_mut() {
                    self.walk(child, depth + 1, report)?;
                }
            }
            Value::Array(items) => {
                self.check_depth(depth)?;
                for item in items.iter_mut() {
                    self.walk(item, depth + 1, report)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), NormalizeError> {
        if depth > self.max_depth {
            return Err(NormalizeError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(256)
    }
}
