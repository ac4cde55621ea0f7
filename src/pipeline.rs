use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::batch::BatchRunner;
use crate::catalog::{self, ToolRecord};
use crate::config::{PipelineConfig, Site};
use crate::content::{self, AssembledContent};
use crate::emit::{EmitReport, Emitter};
use crate::export::{self, ReportPaths};
use crate::keywords::dataforseo::MetricsSource;
use crate::keywords::research::{self, ResearchReport};
use crate::keywords::ToolKeywordSelection;
use crate::sitemap;

/// Output of the assemble + emit stages.
pub struct PublishReport {
    pub emit: EmitReport,
    pub summary_path: PathBuf,
    /// `None` when the sitemap could not be written.
    pub sitemap_path: Option<PathBuf>,
}

/// Output of a full keyword-to-component run.
pub struct RunReport {
    pub research: ResearchReport,
    /// `None` when the keyword reports could not be written.
    pub reports: Option<ReportPaths>,
    pub publish: PublishReport,
}

/// Load the catalog, optionally keeping only the first `limit` tools.
pub fn load_catalog(cfg: &PipelineConfig, limit: Option<usize>) -> Result<Vec<ToolRecord>> {
    let mut tools = catalog::load(&cfg.catalog_path, &cfg.site.url)?;
    if let Some(n) = limit {
        tools.truncate(n);
    }
    Ok(tools)
}

// ── Keyword stage ──

pub async fn research<S: MetricsSource>(
    cfg: &PipelineConfig,
    source: &S,
    tools: &[ToolRecord],
) -> ResearchReport {
    let limits = cfg.limits.normalized();
    let runner = BatchRunner::new(limits.concurrency, limits.delay);
    research::research_all(source, tools, &runner, &limits).await
}

/// Research keywords and write the CSV/JSON/cluster reports.
pub async fn keywords<S: MetricsSource>(
    cfg: &PipelineConfig,
    source: &S,
    tools: &[ToolRecord],
    now: DateTime<Utc>,
) -> Result<(ResearchReport, ReportPaths)> {
    let report = research(cfg, source, tools).await;
    let paths = export::write_reports(&cfg.report_dir, &report, tools.len(), now)?;
    Ok((report, paths))
}

// ── Content stage ──

/// Assemble every page in parallel; output order matches `selections`.
pub fn assemble_all<'a>(
    selections: &'a [ToolKeywordSelection],
    site: &Site,
) -> Vec<(&'a ToolRecord, AssembledContent)> {
    selections
        .par_iter()
        .map(|s| (&s.tool, content::assemble(&s.tool, s, site)))
        .collect()
}

/// Assemble, write components in catalog order, then the summary and sitemap.
pub fn publish(
    cfg: &PipelineConfig,
    selections: &[ToolKeywordSelection],
    now: DateTime<Utc>,
) -> Result<PublishReport> {
    let pages = assemble_all(selections, &cfg.site);
    info!("Assembled content for {} tools", pages.len());

    let emitter = Emitter::new(&cfg.output_dir, &cfg.site);
    let emit = emitter.emit_all(&pages);
    let summary_path = emitter.write_summary(&emit, now)?;

    let written: HashSet<&str> = emit.entries.iter().map(|e| e.slug.as_str()).collect();
    let urls: Vec<String> = pages
        .iter()
        .filter(|(tool, _)| written.contains(tool.slug.as_str()))
        .map(|(tool, _)| tool.review_url.clone())
        .collect();
    let sitemap_path = match sitemap::write_reviews(emitter.out_dir(), &urls) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Sitemap not written: {:#}", e);
            None
        }
    };

    Ok(PublishReport {
        emit,
        summary_path,
        sitemap_path,
    })
}

/// Keyword research, reports, then components for every researched tool.
/// A report that cannot be written is logged; pages are still produced.
pub async fn run<S: MetricsSource>(
    cfg: &PipelineConfig,
    source: &S,
    tools: &[ToolRecord],
    now: DateTime<Utc>,
) -> Result<RunReport> {
    let research = research(cfg, source, tools).await;
    let reports = match export::write_reports(&cfg.report_dir, &research, tools.len(), now) {
        Ok(paths) => Some(paths),
        Err(e) => {
            warn!("Keyword reports not written: {:#}", e);
            None
        }
    };
    let publish = publish(cfg, &research.selections, now)?;
    Ok(RunReport {
        research,
        reports,
        publish,
    })
}

/// Re-attach stored selections to the current catalog by slug. Tools that
/// left the catalog are dropped; the catalog's record replaces the stored
/// one so renamed or re-described tools render with fresh facts.
pub fn join_catalog(
    stored: Vec<ToolKeywordSelection>,
    catalog: &[ToolRecord],
) -> Vec<ToolKeywordSelection> {
    let by_slug: HashMap<&str, (usize, &ToolRecord)> = catalog
        .iter()
        .enumerate()
        .map(|(i, t)| (t.slug.as_str(), (i, t)))
        .collect();

    let mut joined: Vec<(usize, ToolKeywordSelection)> = Vec::with_capacity(stored.len());
    for mut s in stored {
        match by_slug.get(s.slug()) {
            Some(&(pos, tool)) => {
                s.tool = tool.clone();
                joined.push((pos, s));
            }
            None => warn!("Stored selection for '{}' has no catalog entry, skipping", s.slug()),
        }
    }
    joined.sort_by_key(|(pos, _)| *pos);
    joined.into_iter().map(|(_, s)| s).collect()
}
