//! SQLite persistence layer for the product catalog.
//!
//! RULE: Only store.rs talks to the database.
//! Matcher and reconciler call store methods — they never execute SQL
//! directly.
//!
//! Every finder orders by id so "first row wins" tie-breaking is stable
//! across runs.

use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    error::SyncResult,
    normalizer::normalize,
    types::{CatalogId, Cents, SourceTag},
};

/// One persisted catalog row, scoped to a source tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub id: CatalogId,
    pub source: SourceTag,
    pub name: String,
    pub normalized_name: String,
    pub image: String,
    pub price_cents: Cents,
    pub list_price_cents: Cents,
    pub updated_at: i64,
}

/// Read access the matcher needs. Split from the concrete store so the
/// matching policy can be exercised against synthetic catalogs in tests.
pub trait CatalogReader {
    fn find_by_image(&self, source: &str, image: &str) -> SyncResult<Vec<CatalogRow>>;
    fn find_by_normalized_name(&self, source: &str, normalized: &str)
        -> SyncResult<Vec<CatalogRow>>;
    fn find_by_name_prefix(&self, source: &str, pattern: &str) -> SyncResult<Vec<CatalogRow>>;
}

/// Read-plus-write access the reconciler runs against. `CatalogStore` is
/// the production implementation; tests substitute stores that fail on
/// demand to drive the recovery counters.
pub trait CatalogWriter: CatalogReader {
    fn update_price(
        &self,
        id: &str,
        source: &str,
        price_cents: Cents,
        list_price_cents: Cents,
    ) -> SyncResult<()>;
}

pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Open (or create) the catalog database at `path`.
    pub fn open(path: &str) -> SyncResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        if let Err(err) = conn.execute_batch("PRAGMA journal_mode=WAL;") {
            log::debug!("journal_mode=WAL not applied: {err}");
        }
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SyncResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SyncResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_catalog.sql"))?;
        Ok(())
    }

    // ── Catalog seeding ────────────────────────────────────────────

    /// Insert a catalog row. The normalized name is derived here so the
    /// stored matching key can never diverge from the matcher's.
    pub fn insert_product(
        &self,
        id: &str,
        source: &str,
        name: &str,
        image: &str,
        price_cents: Cents,
        list_price_cents: Cents,
    ) -> SyncResult<()> {
        self.conn.execute(
            "INSERT INTO products
             (id, source, name, normalized_name, image, price_cents, list_price_cents, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)",
            params![
                id,
                source,
                name,
                normalize(name),
                image,
                price_cents,
                list_price_cents,
            ],
        )?;
        Ok(())
    }

    // ── Test helper methods ────────────────────────────────────────

    pub fn get_product(&self, source: &str, id: &str) -> SyncResult<Option<CatalogRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, source, name, normalized_name, image, price_cents, list_price_cents, updated_at
                 FROM products
                 WHERE source = ?1 AND id = ?2",
                params![source, id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    pub fn product_count(&self, source: &str) -> SyncResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM products WHERE source = ?1",
            params![source],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CatalogRow> {
        Ok(CatalogRow {
            id: row.get(0)?,
            source: row.get(1)?,
            name: row.get(2)?,
            normalized_name: row.get(3)?,
            image: row.get(4)?,
            price_cents: row.get(5)?,
            list_price_cents: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

// ── Matching lookups ───────────────────────────────────────────────

impl CatalogReader for CatalogStore {
    /// Rows whose image URL is byte-for-byte equal to `image`.
    fn find_by_image(&self, source: &str, image: &str) -> SyncResult<Vec<CatalogRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source, name, normalized_name, image, price_cents, list_price_cents, updated_at
             FROM products
             WHERE source = ?1 AND image = ?2
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![source, image], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Rows whose stored normalized name equals `normalized` exactly.
    fn find_by_normalized_name(
        &self,
        source: &str,
        normalized: &str,
    ) -> SyncResult<Vec<CatalogRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source, name, normalized_name, image, price_cents, list_price_cents, updated_at
             FROM products
             WHERE source = ?1 AND normalized_name = ?2
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![source, normalized], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Rows whose stored normalized name matches a `LIKE` pattern,
    /// e.g. `"leche+entera+%"`.
    fn find_by_name_prefix(
        &self,
        source: &str,
        pattern: &str,
    ) -> SyncResult<Vec<CatalogRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source, name, normalized_name, image, price_cents, list_price_cents, updated_at
             FROM products
             WHERE source = ?1 AND normalized_name LIKE ?2
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![source, pattern], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

// ── Price updates ──────────────────────────────────────────────────

impl CatalogWriter for CatalogStore {
    /// Write the new prices and refresh the row's last-modified stamp.
    /// (source, id) is the row identity, so at most one row changes.
    fn update_price(
        &self,
        id: &str,
        source: &str,
        price_cents: Cents,
        list_price_cents: Cents,
    ) -> SyncResult<()> {
        self.conn.execute(
            "UPDATE products
             SET price_cents = ?1,
                 list_price_cents = ?2,
                 updated_at = ?3
             WHERE id = ?4 AND source = ?5",
            params![
                price_cents,
                list_price_cents,
                chrono::Utc::now().timestamp(),
                id,
                source,
            ],
        )?;
        Ok(())
    }
}
