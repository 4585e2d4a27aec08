use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_record_name, record_types_equal};

// ============ Record ============

/// A DNS resource record as exchanged with callers.
///
/// `id` is the provider-assigned identifier; an empty string means it is not
/// known yet and the record has to be created or resolved by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned identifier (decimal string for DNSimple), or empty.
    #[serde(default)]
    pub id: String,
    /// RR type, e.g. `"A"`, `"TXT"`, `"MX"`.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Owner name relative to the zone; `"@"` or empty for the apex.
    pub name: String,
    /// RR data (`content` on the DNSimple wire).
    pub value: String,
    /// Time to live. Zero lets the provider apply its default.
    #[serde(with = "crate::utils::duration_secs", default)]
    pub ttl: Duration,
    /// Priority for MX/SRV; zero when unused.
    #[serde(default)]
    pub priority: u32,
}

impl Record {
    /// Create a record without id, TTL or priority.
    pub fn new(
        record_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether the record carries a provider identifier.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

// ============ Matching ============

/// Which fields identify a remote record when the caller supplies no `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKey {
    /// Owner name only.
    Name,
    /// Owner name and RR type.
    #[default]
    NameAndType,
    /// Owner name, RR type and value.
    NameTypeValue,
}

impl MatchKey {
    /// Whether `remote` matches `wanted` under this key.
    ///
    /// Names are compared after normalization against `zone`; types
    /// case-insensitively; values exactly. An empty type in `wanted` matches
    /// any type, so a name-only record still resolves under `NameAndType`.
    pub fn matches(self, wanted: &Record, remote: &Record, zone: &str) -> bool {
        if normalize_record_name(&wanted.name, zone) != normalize_record_name(&remote.name, zone)
        {
            return false;
        }
        let type_matches = wanted.record_type.is_empty()
            || record_types_equal(&wanted.record_type, &remote.record_type);
        match self {
            Self::Name => true,
            Self::NameAndType => type_matches,
            Self::NameTypeValue => type_matches && wanted.value == remote.value,
        }
    }
}

/// What to do when an id-less record matches several remote records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Fail that record with [`ProviderError::AmbiguousRecord`].
    #[default]
    Reject,
    /// Use the candidate with the lowest numeric id.
    FirstMatch,
}

/// Knobs for the id resolution fallback of Set and Delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Match key used by `set_records` for records without id.
    pub set_match: MatchKey,
    /// Match key used by `delete_records` for records without id.
    pub delete_match: MatchKey,
    /// Policy when several remote records match.
    pub ambiguity: AmbiguityPolicy,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            set_match: MatchKey::NameAndType,
            delete_match: MatchKey::Name,
            ambiguity: AmbiguityPolicy::Reject,
        }
    }
}

// ============ Batch Outcome ============

/// A record that could not be applied, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    /// Index of the record in the caller's input slice.
    pub index: usize,
    /// The input record as supplied by the caller.
    pub record: Record,
    /// Why it failed.
    pub error: ProviderError,
}

/// Per-record result of a best-effort batch (Append, Set, Delete).
///
/// Every input record appears exactly once, either in `succeeded` or in
/// `failures`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Records that were created, updated or deleted, in input order.
    pub succeeded: Vec<Record>,
    /// Records that failed, in input order.
    pub failures: Vec<RecordFailure>,
}

impl BatchOutcome {
    /// Total number of records the batch covered.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }

    /// Whether every record succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records that failed, without the reasons.
    pub fn failed_records(&self) -> Vec<&Record> {
        self.failures.iter().map(|f| &f.record).collect()
    }

    /// All-or-nothing view: the succeeded records, or
    /// [`ProviderError::BatchIncomplete`] if anything failed.
    pub fn into_result(self) -> Result<Vec<Record>> {
        match self.failures.first() {
            None => Ok(self.succeeded),
            Some(first) => {
                Err(ProviderError::BatchIncomplete {
                    provider: first.error.provider().to_string(),
                    failed: self.failures.len(),
                    total: self.total(),
                    first_failure: first.error.to_string(),
                })
            }
        }
    }

    /// Assemble an outcome from per-record results given in input order.
    pub(crate) fn from_results(records: &[Record], results: Vec<Result<Record>>) -> Self {
        let mut outcome = Self::default();
        for (index, (record, result)) in records.iter().zip(results).enumerate() {
            match result {
                Ok(done) => outcome.succeeded.push(done),
                Err(error) => outcome.failures.push(RecordFailure {
                    index,
                    record: record.clone(),
                    error,
                }),
            }
        }
        outcome
    }
}
