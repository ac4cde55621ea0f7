use serde::{Deserialize, Serialize};

use super::template::{bounded, squash};
use super::ContentContext;

pub const TITLE_MAX: usize = 60;
pub const DESCRIPTION_MAX: usize = 155;

const DESCRIPTION_CTA: &str = " Get expert insights & alternatives.";
const META_KEYWORD_SECONDARIES: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

pub fn seo_meta(ctx: &ContentContext) -> SeoMeta {
    SeoMeta {
        title: title(ctx),
        description: description(ctx),
        keywords: keywords(ctx),
    }
}

/// "{name} Review: {keyword remainder} | {brand}", or the short form when
/// that overflows or the keyword says nothing beyond "{name} review".
pub fn title(ctx: &ContentContext) -> String {
    let remainder = squash(&ctx.without_name(ctx.primary_keyword()).replacen("review", "", 1));
    let primary = (!remainder.is_empty())
        .then(|| format!("{} Review: {} | {}", ctx.name(), remainder, ctx.site.brand));

    bounded(primary, TITLE_MAX, || format!("{} Review | {}", ctx.name(), ctx.site.brand))
}

pub fn description(ctx: &ContentContext) -> String {
    let secondary = ctx
        .selection
        .find_secondary(&["features", "pricing"])
        .map(|k| ctx.without_name(&k.keyword))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "features".to_string());

    let primary = format!(
        "{}. Compare {} {}.{}",
        ctx.primary_keyword(),
        ctx.name(),
        secondary,
        DESCRIPTION_CTA
    );

    bounded(Some(primary), DESCRIPTION_MAX, || {
        format!(
            "{} review: features, pricing, alternatives. Expert analysis & comparison guide.",
            ctx.name()
        )
    })
}

fn keywords(ctx: &ContentContext) -> String {
    std::iter::once(ctx.primary_keyword())
        .chain(
            ctx.selection
                .secondary
                .iter()
                .take(META_KEYWORD_SECONDARIES)
                .map(|k| k.keyword.as_str()),
        )
        .collect::<Vec<_>>()
        .join(", ")
}
