use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

const DEFAULT_CATEGORY: &str = "Other";

/// One AI tool as read from the catalog. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub website: String,
    pub review_url: String,
}

// Raw catalog shape: facts live under `overview`, with `meta` as a
// secondary source for the description.
#[derive(Deserialize)]
struct RawTool {
    #[serde(default)]
    id: Option<serde_json::Value>,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    overview: Option<RawOverview>,
    #[serde(default)]
    meta: Option<RawMeta>,
}

#[derive(Deserialize, Default)]
struct RawOverview {
    category: Option<String>,
    description: Option<String>,
    website: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawMeta {
    description: Option<String>,
}

/// Load the tool catalog. A missing or malformed file is fatal; an empty
/// array is a valid (empty) catalog.
pub fn load(path: &Path, site_url: &str) -> Result<Vec<ToolRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tool catalog {}", path.display()))?;
    let tools = parse(&raw, site_url)
        .with_context(|| format!("Failed to parse tool catalog {}", path.display()))?;
    info!("Loaded {} tools from {}", tools.len(), path.display());
    Ok(tools)
}

pub fn parse(json: &str, site_url: &str) -> Result<Vec<ToolRecord>> {
    let raw: Vec<RawTool> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    let mut tools = Vec::with_capacity(raw.len());

    for r in raw {
        let tool = to_record(r, site_url);
        if tool.slug.is_empty() {
            warn!("Tool '{}' has no usable slug, skipping", tool.name);
            continue;
        }
        if !seen.insert(tool.slug.clone()) {
            warn!("Duplicate slug '{}' ({}), keeping first occurrence", tool.slug, tool.name);
            continue;
        }
        tools.push(tool);
    }
    Ok(tools)
}

fn to_record(r: RawTool, site_url: &str) -> ToolRecord {
    let overview = r.overview.unwrap_or_default();
    let meta = r.meta.unwrap_or_default();

    let slug = r
        .slug
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slugify(&r.name));
    let id = match r.id {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => slug.clone(),
    };

    ToolRecord {
        id,
        review_url: format!("{}/reviews/{}", site_url.trim_end_matches('/'), slug),
        category: overview
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        description: overview.description.or(meta.description).unwrap_or_default(),
        website: overview.website.unwrap_or_default(),
        name: r.name,
        slug,
    }
}

/// Lowercase, collapse every non-alphanumeric run into a single `-`.
pub fn slugify(s: &str) -> String {
    NON_SLUG_RE
        .replace_all(&s.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}
