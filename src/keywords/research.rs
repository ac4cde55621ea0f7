use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::dataforseo::MetricsSource;
use super::{rank_by_volume, variations, KeywordMetric, ToolKeywordSelection};
use crate::batch::BatchRunner;
use crate::catalog::ToolRecord;
use crate::config::Limits;

/// Outcome of researching one tool.
pub struct ToolResearch {
    pub selection: Option<ToolKeywordSelection>,
    pub cost: f64,
    pub lookup_failed: bool,
}

/// Research results for the whole catalog, in catalog order.
pub struct ResearchReport {
    pub selections: Vec<ToolKeywordSelection>,
    pub total_cost: f64,
    pub failed_tools: Vec<String>,
}

impl ResearchReport {
    pub fn total_volume(&self) -> u64 {
        self.selections.iter().map(|s| s.total_volume).sum()
    }
}

/// Look up every keyword variation for `tool` in one batched call.
/// A failed call is logged and replaced by error fallbacks.
pub async fn research_tool<S: MetricsSource>(
    source: &S,
    tool: &ToolRecord,
    limits: &Limits,
) -> ToolResearch {
    let keywords = variations(tool, limits.max_keywords_per_tool);

    let (metrics, cost, lookup_failed) = match source.search_volume(&keywords).await {
        Ok(batch) => (batch.metrics, batch.cost, false),
        Err(e) => {
            warn!("Keyword lookup failed for {}: {:#}", tool.name, e);
            let fallback = keywords
                .iter()
                .map(|k| KeywordMetric::fallback(k.as_str()))
                .collect();
            (fallback, 0.0, true)
        }
    };

    let selection = ToolKeywordSelection::from_ranked(
        tool.clone(),
        rank_by_volume(metrics),
        limits.secondary_keywords,
    );

    ToolResearch {
        selection,
        cost,
        lookup_failed,
    }
}

pub async fn research_all<S: MetricsSource>(
    source: &S,
    tools: &[ToolRecord],
    runner: &BatchRunner,
    limits: &Limits,
) -> ResearchReport {
    info!(
        "Starting keyword research for {} tools ({} per batch)",
        tools.len(),
        runner.concurrency()
    );

    let pb = ProgressBar::new(tools.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} keywords ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let total = tools.len();
    let outcomes = runner
        .run(tools, |i, tool| {
            let pb = pb.clone();
            async move {
                let outcome = research_tool(source, tool, limits).await;
                if let Some(sel) = &outcome.selection {
                    info!(
                        "[{}/{}] {}: primary \"{}\" ({} vol), {} secondary",
                        i + 1,
                        total,
                        tool.name,
                        sel.primary.keyword,
                        sel.primary.search_volume,
                        sel.secondary.len()
                    );
                }
                pb.inc(1);
                outcome
            }
        })
        .await;
    pb.finish_and_clear();

    let mut report = ResearchReport {
        selections: Vec::with_capacity(total),
        total_cost: 0.0,
        failed_tools: Vec::new(),
    };
    for (tool, outcome) in tools.iter().zip(outcomes) {
        report.total_cost += outcome.cost;
        if outcome.lookup_failed {
            report.failed_tools.push(tool.slug.clone());
        }
        match outcome.selection {
            Some(sel) => report.selections.push(sel),
            None => warn!("No keywords for {}, skipping", tool.slug),
        }
    }

    info!(
        "Keyword research done: {} tools, {} lookup failures, ${:.2} API cost",
        report.selections.len(),
        report.failed_tools.len(),
        report.total_cost
    );
    report
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use anyhow::{bail, Result};

    use super::*;
    use crate::keywords::dataforseo::LookupBatch;
    use crate::keywords::tests::{metric, tool};
    use crate::keywords::CompetitionLevel;

    /// Volumes by keyword; unknown keywords get `default_volume`.
    pub struct StubSource {
        pub volumes: HashMap<String, u64>,
        pub default_volume: u64,
        pub fail_for: Vec<String>,
    }

    impl StubSource {
        pub fn new(volumes: &[(&str, u64)]) -> Self {
            Self {
                volumes: volumes.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                default_volume: 10,
                fail_for: Vec::new(),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_for: vec![String::new()],
                ..Self::new(&[])
            }
        }
    }

    impl MetricsSource for StubSource {
        async fn search_volume(&self, keywords: &[String]) -> Result<LookupBatch> {
            if self
                .fail_for
                .iter()
                .any(|f| keywords.iter().any(|k| k.contains(f.as_str())))
            {
                bail!("stub API failure");
            }
            let metrics = keywords
                .iter()
                .map(|k| metric(k, *self.volumes.get(k).unwrap_or(&self.default_volume)))
                .collect();
            Ok(LookupBatch {
                metrics,
                cost: 0.01 * keywords.len() as f64,
            })
        }
    }

    fn limits() -> Limits {
        Limits {
            max_keywords_per_tool: 10,
            secondary_keywords: 9,
            concurrency: 3,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn highest_volume_becomes_primary() {
        let source = StubSource::new(&[("acme review", 1000), ("acme pricing", 400)]);
        let out = research_tool(&source, &tool("Acme", "Writing", "acme"), &limits()).await;
        let sel = out.selection.unwrap();

        assert_eq!(sel.primary.keyword, "acme review");
        assert_eq!(sel.secondary[0].keyword, "acme pricing");
        assert_eq!(sel.secondary.len(), 9);
        assert!(sel
            .secondary
            .iter()
            .all(|k| k.search_volume <= sel.primary.search_volume));
        assert!(!out.lookup_failed);
    }

    #[tokio::test]
    async fn api_failure_yields_error_fallbacks() {
        let out = research_tool(&StubSource::failing(), &tool("Acme", "Writing", "acme"), &limits()).await;
        let sel = out.selection.unwrap();

        assert!(out.lookup_failed);
        assert_eq!(out.cost, 0.0);
        assert_eq!(sel.all.len(), 10);
        assert!(sel
            .all
            .iter()
            .all(|k| k.search_volume == 0 && k.competition_level == CompetitionLevel::Error));
        // all volumes tie, so variation order decides
        assert_eq!(sel.primary.keyword, "acme review");
        assert_eq!(sel.failed_lookups(), 10);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_run() {
        let mut source = StubSource::new(&[]);
        source.fail_for = vec!["beta".to_string()];
        let tools = vec![
            tool("Alpha", "Writing", "alpha"),
            tool("Beta", "Video", "beta"),
            tool("Gamma", "Audio", "gamma"),
            tool("Delta", "Audio", "delta"),
        ];
        let runner = BatchRunner::new(3, Duration::ZERO);

        let report = research_all(&source, &tools, &runner, &limits()).await;

        assert_eq!(report.selections.len(), 4);
        assert_eq!(report.failed_tools, vec!["beta".to_string()]);
        let slugs: Vec<&str> = report.selections.iter().map(|s| s.slug()).collect();
        assert_eq!(slugs, ["alpha", "beta", "gamma", "delta"]);
        // three successful tools, ten lookups each
        assert!((report.total_cost - 0.30).abs() < 1e-9);
        assert_eq!(report.total_volume(), 3 * 10 * 10);
    }
}
