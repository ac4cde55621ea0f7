use std::path::PathBuf;
use std::time::Duration;

pub const DATAFORSEO_BASE_URL: &str = "https://api.dataforseo.com/v3";
const LOCATION_CODE: u32 = 2840; // United States
const LANGUAGE_CODE: &str = "en";

const CATALOG_PATH: &str = "public/data/aiToolsData.json";
const OUTPUT_DIR: &str = "seo-optimization/production-components";
const REPORT_DIR: &str = "seo-optimization/output";
const DB_PATH: &str = "data/review_seo.sqlite";

/// Keyword-metrics API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub login: Option<String>,
    pub password: Option<String>,
    pub location_code: u32,
    pub language_code: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn has_credentials(&self) -> bool {
        self.login.as_deref().is_some_and(|l| !l.is_empty())
            && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_keywords_per_tool: usize,
    pub secondary_keywords: usize,
    pub concurrency: usize,
    pub delay: Duration,
}

/// Site identity baked into generated titles, links and schema.
#[derive(Debug, Clone)]
pub struct Site {
    pub brand: String,
    pub url: String,
    pub twitter: String,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub catalog_path: PathBuf,
    pub output_dir: PathBuf,
    pub report_dir: PathBuf,
    pub db_path: PathBuf,
    pub api: ApiConfig,
    pub limits: Limits,
    pub site: Site,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(CATALOG_PATH),
            output_dir: PathBuf::from(OUTPUT_DIR),
            report_dir: PathBuf::from(REPORT_DIR),
            db_path: PathBuf::from(DB_PATH),
            api: ApiConfig {
                base_url: DATAFORSEO_BASE_URL.to_string(),
                login: None,
                password: None,
                location_code: LOCATION_CODE,
                language_code: LANGUAGE_CODE.to_string(),
                timeout: Duration::from_secs(30),
            },
            limits: Limits {
                max_keywords_per_tool: 10,
                secondary_keywords: 9,
                concurrency: 3,
                delay: Duration::from_millis(2000),
            },
            site: Site::default(),
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self {
            brand: "SiteOptz".to_string(),
            url: "https://siteoptz.ai".to_string(),
            twitter: "@siteoptz".to_string(),
        }
    }
}

impl Limits {
    /// Clamp values that would make a stage produce nothing.
    pub fn normalized(self) -> Self {
        Self {
            max_keywords_per_tool: self.max_keywords_per_tool.max(1),
            concurrency: self.concurrency.max(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_limits() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.limits.max_keywords_per_tool, 10);
        assert_eq!(cfg.limits.secondary_keywords, 9);
        assert_eq!(cfg.limits.concurrency, 3);
        assert_eq!(cfg.limits.delay, Duration::from_millis(2000));
        assert!(!cfg.api.has_credentials());
    }

    #[test]
    fn normalized_clamps_zeroes() {
        let limits = Limits {
            max_keywords_per_tool: 0,
            secondary_keywords: 0,
            concurrency: 0,
            delay: Duration::ZERO,
        }
        .normalized();
        assert_eq!(limits.max_keywords_per_tool, 1);
        assert_eq!(limits.concurrency, 1);
        assert_eq!(limits.secondary_keywords, 0);
    }

    #[test]
    fn empty_credentials_are_missing() {
        let mut api = PipelineConfig::default().api;
        api.login = Some("user".into());
        api.password = Some(String::new());
        assert!(!api.has_credentials());
        api.password = Some("secret".into());
        assert!(api.has_credentials());
    }
}
