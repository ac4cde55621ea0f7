pub mod dataforseo;
pub mod research;

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::catalog::ToolRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
    Unknown,
    Error,
}

impl CompetitionLevel {
    /// Map the API's free-form level ("LOW", "medium", ...) onto the enum.
    pub fn from_api(s: Option<&str>) -> Self {
        match s.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("low") => Self::Low,
            Some("medium") => Self::Medium,
            Some("high") => Self::High,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySearch {
    pub year: i32,
    pub month: u32,
    pub search_volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetric {
    pub keyword: String,
    pub search_volume: u64,
    pub cpc: f64,
    pub competition: f64,
    pub competition_level: CompetitionLevel,
    pub monthly_searches: Vec<MonthlySearch>,
}

impl KeywordMetric {
    /// Zero-volume stand-in for a lookup that failed.
    pub fn fallback(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume: 0,
            cpc: 0.0,
            competition: 0.0,
            competition_level: CompetitionLevel::Error,
            monthly_searches: Vec::new(),
        }
    }
}

const VARIATION_TEMPLATES: &[&str] = &[
    "{name} review",
    "{name} pricing",
    "{name} features",
    "{name} vs competitors",
    "{name} alternatives",
    "best {category} tools",
    "{name} tutorial",
    "{name} use cases",
    "{name} comparison",
    "{name} for business",
    "{name} AI tool",
    "{name} software review",
    "how to use {name}",
    "{name} benefits",
    "{name} pros and cons",
];

/// Keyword phrases to look up for a tool, in template priority order.
pub fn variations(tool: &ToolRecord, max: usize) -> Vec<String> {
    let name = tool.name.to_lowercase();
    let category = tool.category.to_lowercase();
    VARIATION_TEMPLATES
        .iter()
        .take(max)
        .map(|t| t.replace("{name}", &name).replace("{category}", &category))
        .collect()
}

/// Sort metrics by descending volume. Equal volumes keep the order of the
/// requested variations, which is the template priority order.
pub fn rank_by_volume(metrics: Vec<KeywordMetric>) -> Vec<KeywordMetric> {
    let mut indexed: Vec<(usize, KeywordMetric)> = metrics.into_iter().enumerate().collect();
    indexed.sort_by_key(|(i, m)| (Reverse(m.search_volume), *i));
    indexed.into_iter().map(|(_, m)| m).collect()
}

/// Per-tool keyword plan derived from ranked metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolKeywordSelection {
    pub tool: ToolRecord,
    pub primary: KeywordMetric,
    pub secondary: Vec<KeywordMetric>,
    pub all: Vec<KeywordMetric>,
    pub total_volume: u64,
    pub average_cpc: f64,
}

impl ToolKeywordSelection {
    /// Build a selection from metrics already ranked by `rank_by_volume`.
    /// Returns `None` when there is nothing to pick a primary keyword from.
    pub fn from_ranked(
        tool: ToolRecord,
        ranked: Vec<KeywordMetric>,
        secondary_count: usize,
    ) -> Option<Self> {
        let primary = ranked.first()?.clone();
        let secondary = ranked.iter().skip(1).take(secondary_count).cloned().collect();
        let total_volume = ranked.iter().map(|k| k.search_volume).sum();
        let average_cpc = ranked.iter().map(|k| k.cpc).sum::<f64>() / ranked.len() as f64;

        Some(Self {
            tool,
            primary,
            secondary,
            all: ranked,
            total_volume,
            average_cpc,
        })
    }

    pub fn slug(&self) -> &str {
        &self.tool.slug
    }

    /// Primary volume weighted by how uncontested the keyword is.
    pub fn opportunity_score(&self) -> u64 {
        let competition = self.primary.competition.clamp(0.0, 1.0);
        (self.primary.search_volume as f64 * (1.0 - competition) * 100.0).round() as u64
    }

    /// First secondary keyword containing any of `needles`.
    pub fn find_secondary(&self, needles: &[&str]) -> Option<&KeywordMetric> {
        self.secondary
            .iter()
            .find(|k| needles.iter().any(|n| k.keyword.contains(n)))
    }

    pub fn failed_lookups(&self) -> usize {
        self.all
            .iter()
            .filter(|k| k.competition_level == CompetitionLevel::Error)
            .count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn tool(name: &str, category: &str, slug: &str) -> ToolRecord {
        ToolRecord {
            id: slug.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
            category: category.to_string(),
            description: format!("{} helps teams ship faster.", name),
            website: format!("https://{}.example", slug),
            review_url: format!("https://siteoptz.ai/reviews/{}", slug),
        }
    }

    pub fn metric(keyword: &str, volume: u64) -> KeywordMetric {
        KeywordMetric {
            keyword: keyword.to_string(),
            search_volume: volume,
            cpc: 1.5,
            competition: 0.4,
            competition_level: CompetitionLevel::Medium,
            monthly_searches: Vec::new(),
        }
    }

    #[test]
    fn variations_substitute_and_truncate() {
        let t = tool("Acme", "Writing", "acme");
        let v = variations(&t, 10);
        assert_eq!(v.len(), 10);
        assert_eq!(v[0], "acme review");
        assert_eq!(v[5], "best writing tools");
        assert_eq!(variations(&t, 100).len(), VARIATION_TEMPLATES.len());
        assert_eq!(variations(&t, 15)[12], "how to use acme");
    }

    #[test]
    fn ranking_is_descending_with_request_order_ties() {
        let ranked = rank_by_volume(vec![
            metric("a", 10),
            metric("b", 50),
            metric("c", 10),
            metric("d", 50),
        ]);
        let order: Vec<&str> = ranked.iter().map(|m| m.keyword.as_str()).collect();
        assert_eq!(order, ["b", "d", "a", "c"]);
    }

    #[test]
    fn selection_partitions_top_n() {
        let ranked = rank_by_volume((0..10).map(|i| metric(&format!("k{}", i), i * 10)).collect());
        let sel = ToolKeywordSelection::from_ranked(tool("Acme", "Writing", "acme"), ranked, 3).unwrap();
        assert_eq!(sel.primary.keyword, "k9");
        assert_eq!(sel.secondary.len(), 3);
        assert!(sel.secondary.iter().all(|k| k.search_volume <= sel.primary.search_volume));
        assert_eq!(sel.total_volume, (0..10).map(|i| i * 10).sum::<u64>());
        assert!((sel.average_cpc - 1.5).abs() < 1e-9);
    }

    #[test]
    fn empty_metrics_have_no_selection() {
        assert!(ToolKeywordSelection::from_ranked(tool("A", "B", "a"), Vec::new(), 9).is_none());
    }

    #[test]
    fn opportunity_score_discounts_competition() {
        let mut m = metric("acme review", 1000);
        m.competition = 0.25;
        let sel = ToolKeywordSelection::from_ranked(tool("Acme", "Writing", "acme"), vec![m], 9).unwrap();
        assert_eq!(sel.opportunity_score(), 75_000);
    }

    #[test]
    fn competition_level_parsing() {
        assert_eq!(CompetitionLevel::from_api(Some("LOW")), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_api(Some("High")), CompetitionLevel::High);
        assert_eq!(CompetitionLevel::from_api(Some("??")), CompetitionLevel::Unknown);
        assert_eq!(CompetitionLevel::from_api(None), CompetitionLevel::Unknown);
    }
}
