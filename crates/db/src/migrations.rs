/// Inline SQL migrations for the copilot-dash database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained. Dates are stored as
/// ISO-8601 `TEXT` (`YYYY-MM-DD`) so lexical order equals date order.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: daily usage
    r#"
CREATE TABLE IF NOT EXISTS daily_usage (
    date                 TEXT PRIMARY KEY,
    active_users         INTEGER NOT NULL DEFAULT 0 CHECK (active_users >= 0),
    total_suggestions    INTEGER NOT NULL DEFAULT 0 CHECK (total_suggestions >= 0),
    accepted_suggestions INTEGER NOT NULL DEFAULT 0 CHECK (accepted_suggestions >= 0),
    chat_requests        INTEGER NOT NULL DEFAULT 0 CHECK (chat_requests >= 0),
    agent_requests       INTEGER NOT NULL DEFAULT 0 CHECK (agent_requests >= 0),
    ingested_at          INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    CHECK (accepted_suggestions <= total_suggestions)
);
"#,
    // Migration 2: weekly usage
    r#"
CREATE TABLE IF NOT EXISTS weekly_usage (
    week_start           TEXT PRIMARY KEY,
    active_users         INTEGER NOT NULL DEFAULT 0 CHECK (active_users >= 0),
    total_suggestions    INTEGER NOT NULL DEFAULT 0 CHECK (total_suggestions >= 0),
    accepted_suggestions INTEGER NOT NULL DEFAULT 0 CHECK (accepted_suggestions >= 0),
    chat_requests        INTEGER NOT NULL DEFAULT 0 CHECK (chat_requests >= 0),
    agent_requests       INTEGER NOT NULL DEFAULT 0 CHECK (agent_requests >= 0),
    ingested_at          INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    CHECK (accepted_suggestions <= total_suggestions)
);
"#,
    // Migration 3: chat mode requests
    r#"
CREATE TABLE IF NOT EXISTS chat_mode_requests (
    date        TEXT NOT NULL,
    mode        TEXT NOT NULL CHECK (mode IN ('edit', 'ask', 'agent', 'custom', 'inline')),
    requests    INTEGER NOT NULL DEFAULT 0 CHECK (requests >= 0),
    ingested_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    PRIMARY KEY (date, mode)
);
"#,
    // Migration 4: model usage
    r#"
CREATE TABLE IF NOT EXISTS model_usage (
    date        TEXT NOT NULL,
    model_name  TEXT NOT NULL,
    requests    INTEGER NOT NULL DEFAULT 0 CHECK (requests >= 0),
    ingested_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    PRIMARY KEY (date, model_name)
);
"#,
    // Migration 5: model usage lookup by name
    r#"CREATE INDEX IF NOT EXISTS idx_model_usage_model ON model_usage(model_name, date);"#,
    // Migration 6: agent adoption
    r#"
CREATE TABLE IF NOT EXISTS agent_adoption (
    date               TEXT PRIMARY KEY,
    total_active_users INTEGER NOT NULL DEFAULT 0 CHECK (total_active_users >= 0),
    agent_users        INTEGER NOT NULL DEFAULT 0 CHECK (agent_users >= 0),
    ingested_at        INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    CHECK (agent_users <= total_active_users)
);
"#,
];
