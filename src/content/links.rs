use serde::{Deserialize, Serialize};

use super::ContentContext;
use crate::catalog::slugify;

const COMPARE_WITH: &[&str] = &["chatgpt", "claude", "notion-ai"];
const FEATURE_IMAGES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalLinks {
    pub category_page: String,
    pub comparison_pages: Vec<String>,
    pub related_tools: String,
    pub pricing_calculator: String,
    pub alternatives_page: String,
    pub getting_started: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    pub hero: ImageMeta,
    pub features: Vec<ImageMeta>,
}

pub fn internal_links(ctx: &ContentContext) -> InternalLinks {
    let slug = &ctx.tool.slug;
    InternalLinks {
        category_page: format!("/categories/{}", slugify(&ctx.tool.category)),
        comparison_pages: COMPARE_WITH
            .iter()
            .filter(|other| **other != slug.as_str())
            .map(|other| format!("/compare/{}/vs/{}", slug, other))
            .collect(),
        related_tools: format!("/tools/?category={}", urlencoding::encode(&ctx.tool.category)),
        pricing_calculator: "/pricing".to_string(),
        alternatives_page: format!("/alternatives/{}", slug),
        getting_started: format!("/guides/getting-started-with-{}", slug),
    }
}

/// Image paths are derived, not checked against any asset store.
pub fn images(ctx: &ContentContext) -> ImageSet {
    let slug = &ctx.tool.slug;
    let keyword = ctx.primary_keyword();

    let hero = ImageMeta {
        src: format!("/images/reviews/{}-review.webp", slug),
        alt: format!("{} - {} dashboard and key features screenshot", keyword, ctx.name()),
        title: format!("{} Interface - {}", ctx.name(), keyword),
        width: 1200,
        height: 630,
    };

    let features = ctx
        .selection
        .secondary
        .iter()
        .take(FEATURE_IMAGES)
        .map(|k| ImageMeta {
            src: format!("/images/reviews/{}-{}.webp", slug, slugify(&k.keyword)),
            alt: format!("{} {} - detailed view", ctx.name(), ctx.without_name(&k.keyword)),
            title: format!("{} {}", ctx.name(), k.keyword),
            width: 800,
            height: 450,
        })
        .collect();

    ImageSet { hero, features }
}

/// schema.org Review of the tool as a SoftwareApplication.
pub fn review_schema(ctx: &ContentContext) -> serde_json::Value {
    serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Review",
        "itemReviewed": {
            "@type": "SoftwareApplication",
            "name": ctx.name(),
            "description": ctx.tool.description,
            "applicationCategory": ctx.tool.category,
            "url": ctx.tool.website,
            "operatingSystem": "Web"
        },
        "author": {
            "@type": "Organization",
            "name": ctx.site.brand,
            "url": ctx.site.url
        },
        "reviewRating": {
            "@type": "Rating",
            "ratingValue": 4.5,
            "bestRating": 5,
            "worstRating": 1
        },
        "reviewBody": format!(
            "Comprehensive {} covering features, pricing, and alternatives.",
            ctx.primary_keyword()
        )
    })
}
