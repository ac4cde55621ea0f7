use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::json;

use super::markup::{js_string, jsx_attr, jsx_text, markdown_to_jsx};
use crate::catalog::ToolRecord;
use crate::config::Site;
use crate::content::links::ImageMeta;
use crate::content::template::{capitalize, fill_marked, Placeholders};
use crate::content::AssembledContent;

const PAGE: &str = r##"import React from 'react';
import Head from 'next/head';
import Image from 'next/image';
import Link from 'next/link';
import { GetStaticProps } from 'next';
import FAQSection from '../../components/comparison/FAQSection';

interface {@component}Props {
  tool: {
    name: string;
    category: string;
    description: string;
    website: string;
    rating: number;
    slug: string;
  };
}

export default function {@component}({ tool }: {@component}Props) {
  const reviewSchema = {@review_schema};

  const breadcrumbSchema = {@breadcrumb_schema};

  const faqSchema = {@faq_schema};

  return (
    <>
      <Head>
        <title>{@title}</title>
        <meta name="description" content="{@description}" />
        <meta name="keywords" content="{@keywords}" />
        <meta name="author" content="{@brand}" />
        <meta name="robots" content="index, follow, max-snippet:-1, max-image-preview:large" />
        <link rel="canonical" href="{@canonical}" />
        <meta property="og:type" content="article" />
        <meta property="og:title" content="{@title}" />
        <meta property="og:description" content="{@description}" />
        <meta property="og:url" content="{@canonical}" />
        <meta property="og:site_name" content="{@brand}" />
        <meta property="og:image" content="{@og_image}" />
        <meta property="og:image:width" content="{@hero_width}" />
        <meta property="og:image:height" content="{@hero_height}" />
        <meta name="twitter:card" content="summary_large_image" />
        <meta name="twitter:title" content="{@title}" />
        <meta name="twitter:description" content="{@description}" />
        <meta name="twitter:image" content="{@og_image}" />
        <meta name="twitter:creator" content="{@twitter}" />
        <script
          type="application/ld+json"
          dangerouslySetInnerHTML={{ __html: JSON.stringify(reviewSchema) }}
        />
        <script
          type="application/ld+json"
          dangerouslySetInnerHTML={{ __html: JSON.stringify(breadcrumbSchema) }}
        />
        <script
          type="application/ld+json"
          dangerouslySetInnerHTML={{ __html: JSON.stringify(faqSchema) }}
        />
      </Head>

      <div className="min-h-screen bg-gradient-to-br from-black via-gray-900 to-black">
        <nav className="pt-8 pb-4" aria-label="Breadcrumb">
          <div className="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
            <ol className="flex items-center space-x-2 text-gray-400 text-sm">
              <li><Link href="/" className="hover:text-cyan-400">Home</Link></li>
              <li><span className="mx-2">/</span></li>
              <li><Link href="{@category_page}" className="hover:text-cyan-400">{@category}</Link></li>
              <li><span className="mx-2">/</span></li>
              <li><Link href="/reviews" className="hover:text-cyan-400">Reviews</Link></li>
              <li><span className="mx-2">/</span></li>
              <li className="text-cyan-400" aria-current="page">{@name}</li>
            </ol>
          </div>
        </nav>

        <section className="py-12">
          <div className="max-w-4xl mx-auto px-4 sm:px-6 lg:px-8">
            <h1 className="text-4xl md:text-5xl font-bold text-white mb-4">{@heading}</h1>
            <p className="text-blue-100 text-sm mb-8">Rated 4.5/5 by the {@brand} editorial team</p>
            <div className="prose prose-lg prose-invert max-w-none mb-8">
{@hero_body}
            </div>
            <div className="flex flex-col sm:flex-row gap-4 mb-8">
              <a href="{@website}" target="_blank" rel="noopener noreferrer" className="bg-gradient-to-r from-blue-600 to-purple-600 text-white font-bold py-4 px-8 rounded-lg text-center">
                Try {@name} Free
              </a>
              <Link href="{@compare_page}" className="border-2 border-cyan-400 text-cyan-400 font-bold py-4 px-8 rounded-lg text-center">
                Compare Alternatives
              </Link>
            </div>
{@hero_image}
          </div>
        </section>

        <section className="py-16">
          <div className="max-w-4xl mx-auto px-4 sm:px-6 lg:px-8">
{@sections}
          </div>
        </section>

        <section className="py-16 bg-gray-900/50" id="faq">
          <div className="max-w-4xl mx-auto px-4 sm:px-6 lg:px-8">
            <div className="text-center mb-12">
              <h2 className="text-3xl font-bold text-white mb-4">{@faq_title}</h2>
              <p className="text-lg text-gray-300">Get answers to common questions about {@name}</p>
            </div>
            <FAQSection faqs={{@faqs}} />
          </div>
        </section>

        <section className="py-16">
          <div className="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
            <div className="text-center mb-12">
              <h2 className="text-3xl font-bold text-white mb-4">Explore More {@category} Tools</h2>
              <p className="text-lg text-gray-300">Compare {@name} with other leading solutions</p>
            </div>
            <div className="grid md:grid-cols-2 lg:grid-cols-3 gap-8">
{@related}
            </div>
          </div>
        </section>

        <section className="py-20">
          <div className="max-w-4xl mx-auto text-center px-4 sm:px-6 lg:px-8">
            <h2 className="text-4xl font-bold text-white mb-6">Ready to Get Started with {@name}?</h2>
            <p className="text-xl text-gray-300 mb-8">
              Join the professionals using {@name} to streamline their {@category_lower} workflows.
            </p>
            <div className="flex flex-col sm:flex-row gap-4 justify-center">
              <a href="{@website}" target="_blank" rel="noopener noreferrer" className="bg-gradient-to-r from-blue-600 to-purple-600 text-white font-bold py-4 px-8 rounded-lg">
                Start Free Trial
              </a>
              <Link href="{@alternatives_page}" className="border-2 border-gray-600 text-gray-300 font-bold py-4 px-8 rounded-lg">
                View Alternatives
              </Link>
            </div>
          </div>
        </section>
      </div>
    </>
  );
}

export const getStaticProps: GetStaticProps = async () => {
  return {
    props: {
      tool: {
        name: {@js_name},
        category: {@js_category},
        description: {@js_description},
        website: {@js_website},
        rating: 4.5,
        slug: {@js_slug}
      }
    },
    revalidate: 86400
  };
};
"##;

struct PageValues(HashMap<&'static str, String>);

impl Placeholders for PageValues {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// `acme-ai` -> `AcmeAi`.
pub fn to_pascal_case(slug: &str) -> String {
    slug.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect()
}

pub fn component_name(slug: &str) -> String {
    format!("{}ReviewPage", to_pascal_case(slug))
}

/// Pretty JSON whose continuation lines sit under `indent`.
fn json_block(value: &impl serde::Serialize, indent: &str) -> Result<String> {
    let text = serde_json::to_string_pretty(value)?;
    Ok(text.replace('\n', &format!("\n{}", indent)))
}

fn image_tag(img: &ImageMeta, class: &str, indent: &str) -> String {
    [
        "<Image".to_string(),
        format!("  src=\"{}\"", jsx_attr(&img.src)),
        format!("  alt=\"{}\"", jsx_attr(&img.alt)),
        format!("  title=\"{}\"", jsx_attr(&img.title)),
        format!("  width={{{}}}", img.width),
        format!("  height={{{}}}", img.height),
        format!("  className=\"{}\"", class),
        "/>".to_string(),
    ]
    .iter()
    .map(|l| format!("{}{}", indent, l))
    .collect::<Vec<_>>()
    .join("\n")
}

fn sections_block(content: &AssembledContent) -> String {
    let mut out = Vec::new();
    for (i, section) in content.main_sections.iter().enumerate() {
        let mut block = format!(
            "            <div className=\"mb-16\" id=\"{}\">\n              <h2 className=\"text-3xl font-bold text-white mb-8\">{}</h2>\n              <div className=\"prose prose-lg prose-invert max-w-none\">\n{}\n              </div>",
            jsx_attr(&section.id),
            jsx_text(&section.heading),
            markdown_to_jsx(&section.body, "                "),
        );
        if let Some(img) = content.images.features.get(i) {
            block.push('\n');
            block.push_str(&image_tag(img, "w-full h-auto rounded-lg mt-8", "              "));
        }
        block.push_str("\n            </div>");
        out.push(block);
    }
    out.join("\n")
}

fn related_block(tool: &ToolRecord, content: &AssembledContent) -> String {
    let links = &content.internal_links;
    let mut cards = vec![(
        links.category_page.clone(),
        format!("Browse {} Tools", tool.category),
        format!("Discover all {} solutions in our directory", tool.category.to_lowercase()),
    )];
    if let Some(first) = links.comparison_pages.first() {
        let other = first.rsplit('/').next().unwrap_or_default();
        cards.push((
            first.clone(),
            format!("{} vs {}", tool.name, to_pascal_case(other)),
            "Side-by-side comparison of features and pricing".to_string(),
        ));
    }
    cards.push((
        links.pricing_calculator.clone(),
        "Pricing Calculator".to_string(),
        "Find the most cost-effective solution for your needs".to_string(),
    ));

    cards
        .iter()
        .map(|(href, title, blurb)| {
            format!(
                "              <Link href=\"{}\" className=\"group\">\n                <div className=\"bg-black border border-gray-800 rounded-xl p-6\">\n                  <h3 className=\"text-xl font-semibold text-white mb-3 group-hover:text-cyan-400\">{}</h3>\n                  <p className=\"text-gray-300\">{}</p>\n                </div>\n              </Link>",
                jsx_attr(href),
                jsx_text(title),
                jsx_text(blurb)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hero markdown without its leading `# ` heading line; the h1 carries it.
fn hero_body(hero: &str) -> String {
    let body = match hero.split_once('\n') {
        Some((first, rest)) if first.starts_with("# ") => rest,
        _ => hero,
    };
    markdown_to_jsx(body, "              ")
}

fn breadcrumb_schema(tool: &ToolRecord, content: &AssembledContent, site: &Site) -> serde_json::Value {
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": [
            { "@type": "ListItem", "position": 1, "name": "Home", "item": site.url },
            {
                "@type": "ListItem",
                "position": 2,
                "name": tool.category,
                "item": format!("{}{}", site.url, content.internal_links.category_page)
            },
            { "@type": "ListItem", "position": 3, "name": "Reviews", "item": format!("{}/reviews", site.url) },
            {
                "@type": "ListItem",
                "position": 4,
                "name": format!("{} Review", tool.name),
                "item": tool.review_url
            }
        ]
    })
}

/// Render the Next.js page component for one tool. The output depends only
/// on its inputs.
pub fn render(tool: &ToolRecord, content: &AssembledContent, site: &Site) -> Result<String> {
    let meta = &content.seo_meta;
    let hero = &content.images.hero;
    let links = &content.internal_links;
    let faqs = serde_json::to_string(&content.faq_section.faqs).context("serializing faqs")?;

    let values: HashMap<&'static str, String> = [
        ("component", component_name(&tool.slug)),
        ("review_schema", json_block(&content.review_schema, "  ")?),
        ("breadcrumb_schema", json_block(&breadcrumb_schema(tool, content, site), "  ")?),
        ("faq_schema", json_block(&content.faq_section.schema, "  ")?),
        ("title", jsx_text(&meta.title)),
        ("description", jsx_attr(&meta.description)),
        ("keywords", jsx_attr(&meta.keywords)),
        ("brand", jsx_attr(&site.brand)),
        ("twitter", jsx_attr(&site.twitter)),
        ("canonical", jsx_attr(&tool.review_url)),
        ("og_image", jsx_attr(&format!("{}{}", site.url, hero.src))),
        ("hero_width", hero.width.to_string()),
        ("hero_height", hero.height.to_string()),
        ("category_page", jsx_attr(&links.category_page)),
        ("category", jsx_text(&tool.category)),
        ("category_lower", jsx_text(&tool.category.to_lowercase())),
        ("name", jsx_text(&tool.name)),
        ("heading", jsx_text(&capitalize(&content.primary_keyword))),
        ("hero_body", hero_body(&content.hero_section)),
        ("website", jsx_attr(&tool.website)),
        (
            "compare_page",
            jsx_attr(links.comparison_pages.first().unwrap_or(&links.alternatives_page)),
        ),
        ("hero_image", image_tag(hero, "w-full h-auto rounded-xl", "            ")),
        ("sections", sections_block(content)),
        ("faq_title", jsx_text(&content.faq_section.title)),
        ("faqs", faqs),
        ("related", related_block(tool, content)),
        ("alternatives_page", jsx_attr(&links.alternatives_page)),
        ("js_name", js_string(&tool.name)),
        ("js_category", js_string(&tool.category)),
        ("js_description", js_string(&tool.description)),
        ("js_website", js_string(&tool.website)),
        ("js_slug", js_string(&tool.slug)),
    ]
    .into_iter()
    .collect();

    Ok(fill_marked(PAGE, "{@", &PageValues(values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::assemble;
    use crate::content::tests::acme_selection;

    fn acme_page() -> String {
        let sel = acme_selection();
        let site = Site::default();
        let content = assemble(&sel.tool, &sel, &site);
        render(&sel.tool, &content, &site).unwrap()
    }

    #[test]
    fn pascal_case_names() {
        assert_eq!(to_pascal_case("acme"), "Acme");
        assert_eq!(to_pascal_case("runway-ml"), "RunwayMl");
        assert_eq!(component_name("notion-ai"), "NotionAiReviewPage");
    }

    #[test]
    fn every_placeholder_is_filled() {
        let page = acme_page();
        assert!(!page.contains("{@"));
        assert!(page.contains("export default function AcmeReviewPage({ tool }: AcmeReviewPageProps)"));
    }

    #[test]
    fn page_carries_meta_and_schema() {
        let page = acme_page();
        assert!(page.contains("<h1 className=\"text-4xl md:text-5xl font-bold text-white mb-4\">Acme review</h1>"));
        assert!(page.contains("<link rel=\"canonical\" href=\"https://siteoptz.ai/reviews/acme\" />"));
        assert!(page.contains("\"@type\": \"FAQPage\""));
        assert!(page.contains("\"@type\": \"BreadcrumbList\""));
        assert!(page.contains("<div className=\"mb-16\" id=\"pricing\">"));
        assert!(page.contains("src=\"/images/reviews/acme-acme-pricing.webp\""));
        assert!(page.contains("name: \"Acme\","));
        assert!(page.contains("<FAQSection faqs={[{\"question\":\"What is Acme and how does it work?\""));
    }

    #[test]
    fn hero_heading_line_is_dropped() {
        let body = hero_body("# Title\n\nFirst paragraph.");
        assert!(!body.contains("Title"));
        assert!(body.contains("First paragraph."));
    }

    #[test]
    fn text_is_escaped() {
        let sel = acme_selection();
        let mut tool = sel.tool.clone();
        tool.name = "A<b>{x}".to_string();
        tool.description = "says \"hi\"".to_string();
        let site = Site::default();
        let content = assemble(&tool, &sel, &site);
        let page = render(&tool, &content, &site).unwrap();

        assert!(page.contains("A&lt;b&gt;{'{'}x{'}'}"));
        assert!(page.contains(r#"description: "says \"hi\"","#));
    }
}
