use std::future::Future;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompetitionLevel, KeywordMetric, MonthlySearch};
use crate::config::ApiConfig;

const SEARCH_VOLUME_PATH: &str = "/keywords_data/google/search_volume/live";
const STATUS_OK: u32 = 20000;
const DEFAULT_TASK_COST: f64 = 0.01;

/// Metrics for one batched lookup, one entry per requested keyword.
#[derive(Debug, Clone)]
pub struct LookupBatch {
    pub metrics: Vec<KeywordMetric>,
    pub cost: f64,
}

/// Anything that can resolve keyword phrases into volume metrics.
pub trait MetricsSource {
    fn search_volume(&self, keywords: &[String]) -> impl Future<Output = Result<LookupBatch>>;
}

#[derive(Serialize)]
struct SearchVolumeTask<'a> {
    keyword: &'a str,
    language_code: &'a str,
    location_code: u32,
    include_serp_info: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status_code: Option<u32>,
    #[serde(default)]
    pub tasks: Option<Vec<ApiTask>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTask {
    #[serde(default)]
    pub status_code: u32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub result: Option<Vec<ApiResult>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiResult {
    #[serde(default)]
    pub search_volume: Option<u64>,
    #[serde(default)]
    pub cpc: Option<f64>,
    // Numeric in the v3 search-volume endpoint, a label in some others.
    #[serde(default)]
    pub competition: Option<serde_json::Value>,
    #[serde(default)]
    pub competition_level: Option<String>,
    #[serde(default)]
    pub monthly_searches: Option<Vec<ApiMonthly>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiMonthly {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub search_volume: Option<u64>,
}

pub struct DataForSeoClient {
    http: reqwest::Client,
    cfg: ApiConfig,
}

impl DataForSeoClient {
    pub fn new(cfg: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, cfg })
    }
}

impl MetricsSource for DataForSeoClient {
    async fn search_volume(&self, keywords: &[String]) -> Result<LookupBatch> {
        let (Some(login), Some(password)) = (&self.cfg.login, &self.cfg.password) else {
            bail!("DataForSEO credentials not configured");
        };

        let tasks: Vec<SearchVolumeTask> = keywords
            .iter()
            .map(|k| SearchVolumeTask {
                keyword: k,
                language_code: &self.cfg.language_code,
                location_code: self.cfg.location_code,
                include_serp_info: true,
            })
            .collect();

        let url = format!("{}{}", self.cfg.base_url.trim_end_matches('/'), SEARCH_VOLUME_PATH);
        debug!("POST {} ({} tasks)", url, tasks.len());

        let response: ApiResponse = self
            .http
            .post(&url)
            .basic_auth(login, Some(password))
            .json(&tasks)
            .send()
            .await
            .context("Search volume request failed")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode search volume response")?;

        Ok(map_tasks(keywords, &response))
    }
}

/// Pair each requested keyword with its task by position. Tasks that did
/// not succeed, or are missing, become error fallbacks.
pub fn map_tasks(keywords: &[String], response: &ApiResponse) -> LookupBatch {
    let tasks = response.tasks.as_deref().unwrap_or_default();
    let mut cost = 0.0;

    let metrics = keywords
        .iter()
        .enumerate()
        .map(|(i, keyword)| {
            let Some(task) = tasks.get(i) else {
                return KeywordMetric::fallback(keyword.as_str());
            };
            cost += task.cost.unwrap_or(DEFAULT_TASK_COST);

            match task.result.as_deref().and_then(|r| r.first()) {
                Some(result) if task.status_code == STATUS_OK => to_metric(keyword, result),
                _ => {
                    debug!(
                        "Task for '{}' failed: {} {}",
                        keyword,
                        task.status_code,
                        task.status_message.as_deref().unwrap_or("")
                    );
                    KeywordMetric::fallback(keyword.as_str())
                }
            }
        })
        .collect();

    LookupBatch { metrics, cost }
}

fn to_metric(keyword: &str, r: &ApiResult) -> KeywordMetric {
    KeywordMetric {
        keyword: keyword.to_string(),
        search_volume: r.search_volume.unwrap_or(0),
        cpc: r.cpc.unwrap_or(0.0).max(0.0),
        competition: r
            .competition
            .as_ref()
            .and_then(|c| c.as_f64())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0),
        competition_level: CompetitionLevel::from_api(r.competition_level.as_deref()),
        monthly_searches: r
            .monthly_searches
            .iter()
            .flatten()
            .map(|m| MonthlySearch {
                year: m.year,
                month: m.month,
                search_volume: m.search_volume.unwrap_or(0),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> ApiResponse {
        let raw = std::fs::read_to_string("tests/fixtures/search_volume_response.json").unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn maps_successful_and_failed_tasks() {
        let kws = keywords(&["acme review", "acme pricing", "acme features"]);
        let batch = map_tasks(&kws, &fixture());

        assert_eq!(batch.metrics.len(), 3);
        let review = &batch.metrics[0];
        assert_eq!(review.search_volume, 1000);
        assert_eq!(review.competition_level, CompetitionLevel::Low);
        assert_eq!(review.monthly_searches.len(), 2);
        assert!((review.cpc - 2.35).abs() < 1e-9);

        // second task has status 40501
        assert_eq!(batch.metrics[1].competition_level, CompetitionLevel::Error);
        assert_eq!(batch.metrics[1].search_volume, 0);

        // third task has a null volume
        assert_eq!(batch.metrics[2].search_volume, 0);
        assert_eq!(batch.metrics[2].competition_level, CompetitionLevel::Unknown);
    }

    #[test]
    fn cost_defaults_per_task() {
        let kws = keywords(&["acme review", "acme pricing", "acme features"]);
        let batch = map_tasks(&kws, &fixture());
        // 0.05 + default 0.01 + 0.05
        assert!((batch.cost - 0.11).abs() < 1e-9);
    }

    #[test]
    fn missing_tasks_become_fallbacks() {
        let kws = keywords(&["a", "b", "c", "d"]);
        let batch = map_tasks(&kws, &fixture());
        assert_eq!(batch.metrics[3], KeywordMetric::fallback("d"));

        let empty = ApiResponse { status_code: Some(40100), tasks: None };
        let batch = map_tasks(&kws, &empty);
        assert!(batch.metrics.iter().all(|m| m.competition_level == CompetitionLevel::Error));
        assert_eq!(batch.cost, 0.0);
    }

    #[test]
    fn request_shape() {
        let task = SearchVolumeTask {
            keyword: "acme review",
            language_code: "en",
            location_code: 2840,
            include_serp_info: true,
        };
        let v = serde_json::to_value(&task).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "keyword": "acme review",
                "language_code": "en",
                "location_code": 2840,
                "include_serp_info": true
            })
        );
    }

    #[tokio::test]
    async fn missing_credentials_fail_the_lookup() {
        let client = DataForSeoClient::new(crate::config::PipelineConfig::default().api).unwrap();
        assert!(client.search_volume(&keywords(&["x"])).await.is_err());
    }
}
