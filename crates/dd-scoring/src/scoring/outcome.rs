//! Shared envelope for scorer output.
//!
//! Neither scorer returns an error. Instead each one builds a [`Scored`] body and, on
//! any degraded path, records a [`FallbackFlag`] and caps the confidence through
//! [`Scored::degrade`]. Callers read the flags rather than matching on error types.

use super::domain::{Confidence, FallbackFlag};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub body: T,
    pub confidence: Confidence,
    pub flags: BTreeSet<FallbackFlag>,
    pub rules_version: String,
}

impl<T> Scored<T> {
    pub fn resolved(body: T, rules_version: impl Into<String>) -> Self {
        Self {
            body,
            confidence: Confidence::High,
            flags: BTreeSet::new(),
            rules_version: rules_version.into(),
        }
    }

    /// Record a fallback and lower confidence to at most `ceiling`.
    pub fn degrade(mut self, flag: FallbackFlag, ceiling: Confidence) -> Self {
        self.flags.insert(flag);
        self.cap_confidence(ceiling)
    }

    pub fn cap_confidence(mut self, ceiling: Confidence) -> Self {
        self.confidence = self.confidence.min(ceiling);
        self
    }

    pub fn has_flag(&self, flag: FallbackFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_degraded(&self) -> bool {
        !self.flags.is_empty()
    }
}
