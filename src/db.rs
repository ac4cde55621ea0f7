use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::emit::ManifestEntry;
use crate::keywords::ToolKeywordSelection;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let conn = Connection::open(path).with_context(|| format!("opening {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS runs (
            id            INTEGER PRIMARY KEY,
            started_at    TEXT NOT NULL,
            finished_at   TEXT,
            total_tools   INTEGER NOT NULL DEFAULT 0,
            total_cost    REAL NOT NULL DEFAULT 0,
            success_count INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS selections (
            id              INTEGER PRIMARY KEY,
            run_id          INTEGER NOT NULL REFERENCES runs(id),
            tool_slug       TEXT NOT NULL,
            tool_name       TEXT NOT NULL,
            category        TEXT NOT NULL,
            primary_keyword TEXT NOT NULL,
            primary_volume  INTEGER NOT NULL,
            total_volume    INTEGER NOT NULL,
            avg_cpc         REAL NOT NULL,
            opportunity     INTEGER NOT NULL,
            payload         TEXT NOT NULL,
            UNIQUE(run_id, tool_slug)
        );
        CREATE INDEX IF NOT EXISTS idx_selections_run ON selections(run_id);

        CREATE TABLE IF NOT EXISTS components (
            id              INTEGER PRIMARY KEY,
            run_id          INTEGER NOT NULL REFERENCES runs(id),
            slug            TEXT NOT NULL,
            component_name  TEXT NOT NULL,
            file_path       TEXT NOT NULL,
            word_count      INTEGER NOT NULL,
            primary_keyword TEXT NOT NULL,
            UNIQUE(run_id, slug)
        );
        CREATE INDEX IF NOT EXISTS idx_components_run ON components(run_id);
        ",
    )?;
    Ok(())
}

// ── Runs ──

pub fn start_run(conn: &Connection, started_at: DateTime<Utc>, total_tools: usize) -> Result<i64> {
    conn.execute(
        "INSERT INTO runs (started_at, total_tools) VALUES (?1, ?2)",
        rusqlite::params![started_at.to_rfc3339(), total_tools as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn finish_run(
    conn: &Connection,
    run_id: i64,
    finished_at: DateTime<Utc>,
    total_cost: f64,
    success_count: usize,
) -> Result<()> {
    conn.execute(
        "UPDATE runs SET finished_at = ?2, total_cost = ?3, success_count = ?4 WHERE id = ?1",
        rusqlite::params![run_id, finished_at.to_rfc3339(), total_cost, success_count as i64],
    )?;
    Ok(())
}

// ── Keyword selections ──

pub fn save_selections(conn: &Connection, run_id: i64, selections: &[ToolKeywordSelection]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO selections
             (run_id, tool_slug, tool_name, category, primary_keyword, primary_volume,
              total_volume, avg_cpc, opportunity, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for s in selections {
            let payload = serde_json::to_string(s)?;
            count += stmt.execute(rusqlite::params![
                run_id,
                s.tool.slug,
                s.tool.name,
                s.tool.category,
                s.primary.keyword,
                s.primary.search_volume as i64,
                s.total_volume as i64,
                s.average_cpc,
                s.opportunity_score() as i64,
                payload,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Selections of the most recent run that stored any, in insertion order.
pub fn fetch_latest_selections(conn: &Connection) -> Result<Vec<ToolKeywordSelection>> {
    let mut stmt = conn.prepare(
        "SELECT payload FROM selections
         WHERE run_id = (SELECT MAX(run_id) FROM selections)
         ORDER BY id",
    )?;
    let payloads = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    payloads
        .iter()
        .map(|p| serde_json::from_str(p).context("decoding stored selection"))
        .collect()
}

pub struct OpportunityRow {
    pub tool_name: String,
    pub category: String,
    pub primary_keyword: String,
    pub primary_volume: u64,
    pub total_volume: u64,
    pub avg_cpc: f64,
    pub opportunity: u64,
}

pub fn fetch_top_opportunities(conn: &Connection, limit: usize) -> Result<Vec<OpportunityRow>> {
    let mut stmt = conn.prepare(
        "SELECT tool_name, category, primary_keyword, primary_volume, total_volume, avg_cpc, opportunity
         FROM selections
         WHERE run_id = (SELECT MAX(run_id) FROM selections)
         ORDER BY opportunity DESC, id
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(OpportunityRow {
                tool_name: row.get(0)?,
                category: row.get(1)?,
                primary_keyword: row.get(2)?,
                primary_volume: row.get::<_, i64>(3)?.max(0) as u64,
                total_volume: row.get::<_, i64>(4)?.max(0) as u64,
                avg_cpc: row.get(5)?,
                opportunity: row.get::<_, i64>(6)?.max(0) as u64,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Components ──

pub fn save_components(conn: &Connection, run_id: i64, entries: &[ManifestEntry]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO components
             (run_id, slug, component_name, file_path, word_count, primary_keyword)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for e in entries {
            count += stmt.execute(rusqlite::params![
                run_id,
                e.slug,
                e.component_name,
                e.file_path,
                e.word_count as i64,
                e.primary_keyword,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Stats ──

pub struct Stats {
    pub runs: usize,
    pub finished_runs: usize,
    pub selections: usize,
    pub components: usize,
    pub total_cost: f64,
    pub last_finished: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let runs: usize = conn.query_row("SELECT COUNT(*) FROM runs", [], |r| r.get(0))?;
    let finished_runs: usize = conn.query_row(
        "SELECT COUNT(*) FROM runs WHERE finished_at IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let selections: usize = conn.query_row("SELECT COUNT(*) FROM selections", [], |r| r.get(0))?;
    let components: usize = conn.query_row("SELECT COUNT(*) FROM components", [], |r| r.get(0))?;
    let total_cost: f64 =
        conn.query_row("SELECT COALESCE(SUM(total_cost), 0.0) FROM runs", [], |r| r.get(0))?;
    let last_finished: Option<String> =
        conn.query_row("SELECT MAX(finished_at) FROM runs", [], |r| r.get(0))?;
    Ok(Stats {
        runs,
        finished_runs,
        selections,
        components,
        total_cost,
        last_finished,
    })
}
