pub mod component;
pub mod markup;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::ToolRecord;
use crate::config::Site;
use crate::content::AssembledContent;

pub const SUMMARY_FILE: &str = "production-summary.json";

/// One emitted page, as listed in the summary and the run store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub slug: String,
    pub tool_name: String,
    pub component_name: String,
    pub file_path: String,
    pub primary_keyword: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitFailure {
    pub slug: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct EmitReport {
    pub attempted: usize,
    pub entries: Vec<ManifestEntry>,
    pub failures: Vec<EmitFailure>,
}

impl EmitReport {
    pub fn total_words(&self) -> usize {
        self.entries.iter().map(|e| e.word_count).sum()
    }

    pub fn average_words(&self) -> usize {
        if self.entries.is_empty() {
            0
        } else {
            (self.total_words() as f64 / self.entries.len() as f64).round() as usize
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    generated_at: String,
    total_attempted: usize,
    success_count: usize,
    total_components: usize,
    failed: &'a [EmitFailure],
    total_estimated_words: usize,
    average_words_per_component: usize,
    components: &'a [ManifestEntry],
}

pub struct Emitter<'a> {
    out_dir: PathBuf,
    site: &'a Site,
}

impl<'a> Emitter<'a> {
    pub fn new(out_dir: impl Into<PathBuf>, site: &'a Site) -> Self {
        Self { out_dir: out_dir.into(), site }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Render and write one component, overwriting any previous file.
    pub fn emit(&self, tool: &ToolRecord, content: &AssembledContent) -> Result<ManifestEntry> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating {}", self.out_dir.display()))?;

        let source = component::render(tool, content, self.site)?;
        let component_name = component::component_name(&tool.slug);
        let file_name = format!("{}.tsx", component_name);
        let path = self.out_dir.join(&file_name);

        std::fs::write(&path, &source).with_context(|| format!("writing {}", path.display()))?;

        Ok(ManifestEntry {
            slug: tool.slug.clone(),
            tool_name: tool.name.clone(),
            component_name,
            file_path: file_name,
            primary_keyword: content.primary_keyword.clone(),
            word_count: markup::estimate_word_count(&source),
        })
    }

    /// Write every page in order. A failed write is logged and recorded;
    /// the remaining tools are still emitted. A slug whose component name
    /// was already written this run is recorded as a failure instead of
    /// overwriting the earlier file.
    pub fn emit_all(&self, pages: &[(&ToolRecord, AssembledContent)]) -> EmitReport {
        let pb = ProgressBar::new(pages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        let mut report = EmitReport {
            attempted: pages.len(),
            ..Default::default()
        };

        // component name -> slug that claimed it
        let mut claimed: HashMap<String, String> = HashMap::new();

        for (tool, content) in pages {
            let name = component::component_name(&tool.slug);
            if let Some(owner) = claimed.get(&name) {
                warn!(slug = %tool.slug, "{} already written for '{}', skipping", name, owner);
                report.failures.push(EmitFailure {
                    slug: tool.slug.clone(),
                    error: format!("component name {} already used by slug '{}'", name, owner),
                });
                pb.inc(1);
                continue;
            }

            match self.emit(tool, content) {
                Ok(entry) => {
                    info!(slug = %entry.slug, words = entry.word_count, "wrote {}", entry.file_path);
                    claimed.insert(name, tool.slug.clone());
                    report.entries.push(entry);
                }
                Err(e) => {
                    warn!(slug = %tool.slug, "emit failed: {:#}", e);
                    report.failures.push(EmitFailure {
                        slug: tool.slug.clone(),
                        error: format!("{:#}", e),
                    });
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        report
    }

    pub fn write_summary(&self, report: &EmitReport, generated_at: DateTime<Utc>) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating {}", self.out_dir.display()))?;

        let summary = Summary {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_attempted: report.attempted,
            success_count: report.entries.len(),
            total_components: report.entries.len(),
            failed: &report.failures,
            total_estimated_words: report.total_words(),
            average_words_per_component: report.average_words(),
            components: &report.entries,
        };

        let path = self.out_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}
