// crates/ops-warden-core/src/core/audit.rs
// ============================================================================
// Module: Ops Warden Audit Log
// Description: Append-only audit records for dispatched tool invocations.
// Purpose: Capture one record per dispatched operation for status reporting.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The audit log records every policy-approved invocation that reached an
//! operation. Denied requests are never audited here because the operation
//! was never called. The in-memory log is authoritative for status
//! reporting; [`AuditSink`] implementations mirror records to external
//! destinations (one JSON line per record) and are intentionally
//! dependency-light so deployments can route events to their preferred
//! logging pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::policy::ToolName;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Audit Records
// ============================================================================

/// One dispatched tool invocation.
///
/// # Invariants
/// - A record exists only for invocations that reached an operation.
/// - Records are never removed within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Host-supplied timestamp for the invocation.
    pub timestamp: Timestamp,
    /// Tool that was invoked.
    pub action: ToolName,
    /// Arguments passed to the operation.
    pub details: Value,
}

// ============================================================================
// SECTION: Audit Log
// ============================================================================

/// Append-only in-memory audit log.
///
/// # Invariants
/// - Appends are safe under concurrent writers; ordering is the lock order,
///   consistent with each entry's own timestamp.
#[derive(Debug, Default)]
pub struct AuditLog {
    /// Recorded invocations in append order.
    records: Mutex<Vec<AuditRecord>>,
}

impl AuditLog {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the log.
    pub fn append(&self, record: AuditRecord) {
        let mut records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        records.push(record);
    }

    /// Returns the number of recorded invocations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    /// Returns true when no invocation has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the most recent `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<AuditRecord> {
        let records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let start = records.len().saturating_sub(count);
        records[start..].to_vec()
    }

    /// Returns a snapshot of the full log in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

// ============================================================================
// SECTION: Audit Sinks
// ============================================================================

/// Mirror destination for audit records.
pub trait AuditSink: Send + Sync {
    /// Records one dispatched invocation. Must never fail the request.
    fn record(&self, record: &AuditRecord);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, record: &AuditRecord) {
        if let Ok(payload) = serde_json::to_string(record) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _record: &AuditRecord) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
