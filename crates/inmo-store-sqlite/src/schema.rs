//! SQL schema for the Inmo SQLite store.
//!
//! Executed once at connection startup. Referential actions carry the
//! cascade rules: deleting a property removes its images and detaches its
//! leads; deleting an agent detaches its properties.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Identities known to the built-in session provider.
CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

-- Only the SHA-256 digest of a token is ever stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash  TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id     TEXT PRIMARY KEY,
    role        TEXT NOT NULL,   -- 'admin' | 'agent' | 'user'
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS agents (
    agent_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    phone       TEXT,
    user_id     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS properties (
    property_id   TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    description   TEXT,
    operation     TEXT NOT NULL,   -- 'venta' | 'alquiler' | 'temporal'
    kind          TEXT NOT NULL,   -- 'casa' | 'departamento' | 'ph' | 'lote' | 'local'
    price_usd     REAL,
    price_ars     REAL,
    address       TEXT,
    city          TEXT NOT NULL,
    province      TEXT NOT NULL,
    lat           REAL,
    lng           REAL,
    rooms         INTEGER,
    bathrooms     INTEGER,
    area_covered  REAL,
    area_total    REAL,
    featured      INTEGER NOT NULL DEFAULT 0,
    active        INTEGER NOT NULL DEFAULT 1,
    agent_id      TEXT REFERENCES agents(agent_id) ON DELETE SET NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS images (
    image_id     TEXT PRIMARY KEY,
    property_id  TEXT NOT NULL REFERENCES properties(property_id) ON DELETE CASCADE,
    url          TEXT NOT NULL,
    alt          TEXT,
    storage_key  TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS leads (
    lead_id      TEXT PRIMARY KEY,
    kind         TEXT NOT NULL,   -- 'contacto' | 'tasacion'
    property_id  TEXT REFERENCES properties(property_id) ON DELETE SET NULL,
    name         TEXT NOT NULL,
    phone        TEXT,
    email        TEXT,
    message      TEXT NOT NULL,
    is_read      INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    CHECK (phone IS NOT NULL OR email IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS properties_agent_idx   ON properties(agent_id);
CREATE INDEX IF NOT EXISTS properties_created_idx ON properties(created_at);
CREATE INDEX IF NOT EXISTS images_property_idx    ON images(property_id);
CREATE INDEX IF NOT EXISTS leads_created_idx      ON leads(created_at);
CREATE INDEX IF NOT EXISTS sessions_user_idx      ON sessions(user_id);

PRAGMA user_version = 1;
";
