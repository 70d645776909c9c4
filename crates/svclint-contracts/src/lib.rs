//! Shared, version-pinned schema identifiers.
//!
//! These constants are the single source of truth for schema/version strings
//! that appear in machine-readable I/O (model documents and lint reports).

pub const SVCMODEL_SCHEMA_VERSION: &str = "svclint.model@0.1.0";
pub const SVCDIAG_SCHEMA_VERSION: &str = "svclint.diag@0.1.0";
pub const SVCLINT_REPORT_SCHEMA_VERSION: &str = "svclint.report@0.1.0";
