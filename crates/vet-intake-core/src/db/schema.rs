//! SQLite schema definition.

/// Complete database schema for the intake store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Application State
-- ============================================================================

-- One JSON snapshot per storage key, written after every mutation
CREATE TABLE IF NOT EXISTS app_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                         -- JSON snapshot {version, queue, schedule}
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
