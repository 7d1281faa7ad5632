// crates/ops-warden-core/src/core/mod.rs
// ============================================================================
// Module: Ops Warden Core Types
// Description: Canonical policy document, audit, and time structures.
// Purpose: Provide stable, serializable types for policies and audit logs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the policy document, the decision vocabulary, audit
//! records, and timestamps. These types are the canonical source of truth for
//! any derived API surfaces (HTTP or SDKs).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod decision;
pub mod policy;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditLog;
pub use audit::AuditRecord;
pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use decision::Decision;
pub use decision::DenialClass;
pub use policy::GlobalRules;
pub use policy::ModeName;
pub use policy::ModeRules;
pub use policy::PolicyDocument;
pub use policy::PolicyWarning;
pub use policy::ToolName;
pub use policy::UnknownModeError;
pub use time::Timestamp;
