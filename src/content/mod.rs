pub mod faq;
pub mod links;
pub mod meta;
pub mod sections;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::catalog::ToolRecord;
use crate::config::Site;
use crate::keywords::ToolKeywordSelection;
use faq::FaqSection;
use links::{ImageSet, InternalLinks};
use meta::SeoMeta;
use sections::ContentSection;
use template::{capitalize, Placeholders};

/// Everything rendered for one tool's review page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledContent {
    pub primary_keyword: String,
    pub seo_meta: SeoMeta,
    pub hero_section: String,
    pub main_sections: Vec<ContentSection>,
    pub faq_section: FaqSection,
    pub internal_links: InternalLinks,
    pub images: ImageSet,
    pub review_schema: serde_json::Value,
}

/// Typed view of a tool + its keyword plan that templates read from.
pub struct ContentContext<'a> {
    pub tool: &'a ToolRecord,
    pub selection: &'a ToolKeywordSelection,
    pub site: &'a Site,
    name_lower: String,
    category_lower: String,
    keyword_title: String,
}

impl<'a> ContentContext<'a> {
    pub fn new(tool: &'a ToolRecord, selection: &'a ToolKeywordSelection, site: &'a Site) -> Self {
        Self {
            tool,
            selection,
            site,
            name_lower: tool.name.to_lowercase(),
            category_lower: tool.category.to_lowercase(),
            keyword_title: capitalize(&selection.primary.keyword),
        }
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }

    pub fn primary_keyword(&self) -> &str {
        &self.selection.primary.keyword
    }

    /// `keyword` with the lowercase tool name removed.
    pub fn without_name(&self, keyword: &str) -> String {
        template::squash(&keyword.replace(&self.name_lower, ""))
    }
}

impl Placeholders for ContentContext<'_> {
    fn lookup(&self, key: &str) -> Option<&str> {
        let value = match key {
            "name" => &self.tool.name,
            "category" => &self.tool.category,
            "category_lower" => &self.category_lower,
            "description" => &self.tool.description,
            "keyword" => &self.selection.primary.keyword,
            "keyword_title" => &self.keyword_title,
            "brand" => &self.site.brand,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Render the full page payload. Never fails: every piece falls back to a
/// generic template rather than erroring.
pub fn assemble(tool: &ToolRecord, selection: &ToolKeywordSelection, site: &Site) -> AssembledContent {
    let ctx = ContentContext::new(tool, selection, site);

    AssembledContent {
        primary_keyword: selection.primary.keyword.clone(),
        seo_meta: meta::seo_meta(&ctx),
        hero_section: sections::hero(&ctx),
        main_sections: sections::main_sections(&ctx),
        faq_section: faq::faq_section(&ctx),
        internal_links: links::internal_links(&ctx),
        images: links::images(&ctx),
        review_schema: links::review_schema(&ctx),
    }
}
