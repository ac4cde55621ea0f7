use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::keywords::research::ResearchReport;
use crate::keywords::ToolKeywordSelection;

const CSV_HEADER: &[&str] = &[
    "Tool Name",
    "Slug",
    "Category",
    "Review URL",
    "Primary Keyword",
    "Primary Volume",
    "Primary CPC",
    "Competition Level",
    "Secondary Keywords",
    "Total Volume",
    "Opportunity Score",
];

pub struct ReportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub clusters: PathBuf,
}

/// File-name safe UTC stamp, e.g. `2026-10-16T09-30-00`.
pub fn report_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Quote a CSV field when it holds a delimiter, quote or line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn selections_csv(selections: &[ToolKeywordSelection]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');

    for s in selections {
        let secondary = s
            .secondary
            .iter()
            .map(|k| format!("{} ({})", k.keyword, k.search_volume))
            .collect::<Vec<_>>()
            .join("; ");

        let row = [
            csv_field(&s.tool.name),
            csv_field(&s.tool.slug),
            csv_field(&s.tool.category),
            csv_field(&s.tool.review_url),
            csv_field(&s.primary.keyword),
            s.primary.search_volume.to_string(),
            format!("{:.2}", s.primary.cpc),
            s.primary.competition_level.as_str().to_string(),
            csv_field(&secondary),
            s.total_volume.to_string(),
            s.opportunity_score().to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Cluster {
    pub tool_count: usize,
    pub total_volume: u64,
    pub primary_keywords: Vec<String>,
}

/// Group selections by category.
pub fn keyword_clusters(selections: &[ToolKeywordSelection]) -> BTreeMap<String, Cluster> {
    let mut clusters: BTreeMap<String, Cluster> = BTreeMap::new();
    for s in selections {
        let c = clusters.entry(s.tool.category.clone()).or_default();
        c.tool_count += 1;
        c.total_volume += s.total_volume;
        c.primary_keywords.push(s.primary.keyword.clone());
    }
    clusters
}

#[derive(Serialize)]
struct KeywordReport<'a> {
    generated_at: String,
    total_tools: usize,
    total_cost: f64,
    keyword_results: BTreeMap<&'a str, &'a ToolKeywordSelection>,
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

/// Write the CSV, JSON and cluster reports for one research pass.
pub fn write_reports(
    dir: &Path,
    report: &ResearchReport,
    total_tools: usize,
    now: DateTime<Utc>,
) -> Result<ReportPaths> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let stamp = report_stamp(now);

    let csv = dir.join(format!("keywords-{}.csv", stamp));
    write_file(&csv, &selections_csv(&report.selections))?;

    let json = dir.join(format!("keywords-{}.json", stamp));
    let body = KeywordReport {
        generated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        total_tools,
        total_cost: report.total_cost,
        keyword_results: report.selections.iter().map(|s| (s.slug(), s)).collect(),
    };
    write_file(&json, &serde_json::to_string_pretty(&body)?)?;

    let clusters = dir.join(format!("keyword-clusters-{}.json", stamp));
    write_file(
        &clusters,
        &serde_json::to_string_pretty(&keyword_clusters(&report.selections))?,
    )?;

    info!("Reports: {}, {}, {}", csv.display(), json.display(), clusters.display());
    Ok(ReportPaths { csv, json, clusters })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::{acme_selection, selection};
    use crate::keywords::tests::tool;
    use chrono::TimeZone;

    #[test]
    fn stamp_is_filename_safe() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 7).unwrap();
        assert_eq!(report_stamp(now), "2026-10-16T09-05-07");
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_row_per_selection() {
        let csv = selections_csv(&[acme_selection()]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Tool Name,Slug,Category,Review URL"));
        assert!(lines[1].starts_with("Acme,acme,Writing,https://siteoptz.ai/reviews/acme,acme review,1000,1.50,medium,"));
        assert!(lines[1].contains("acme pricing (800); acme features (600)"));
        assert!(lines[1].ends_with(",3400,60000"));
    }

    #[test]
    fn clusters_by_category() {
        let a = selection(&tool("A", "Writing", "a"), &[("a review", 10)]);
        let b = selection(&tool("B", "Writing", "b"), &[("b review", 20)]);
        let c = selection(&tool("C", "Video", "c"), &[("c review", 5)]);
        let clusters = keyword_clusters(&[a, b, c]);

        assert_eq!(clusters.len(), 2);
        let writing = &clusters["Writing"];
        assert_eq!(writing.tool_count, 2);
        assert_eq!(writing.total_volume, 30);
        assert_eq!(writing.primary_keywords, vec!["a review", "b review"]);
    }

    #[test]
    fn writes_three_reports() {
        let dir = tempfile::tempdir().unwrap();
        let report = ResearchReport {
            selections: vec![acme_selection()],
            total_cost: 0.06,
            failed_tools: vec![],
        };
        let paths = write_reports(dir.path(), &report, 1, Utc::now()).unwrap();

        assert!(paths.csv.exists());
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert_eq!(v["total_tools"], 1);
        assert_eq!(v["keyword_results"]["acme"]["primary"]["keyword"], "acme review");
        let clusters: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.clusters).unwrap()).unwrap();
        assert_eq!(clusters["Writing"]["tool_count"], 1);
    }
}
