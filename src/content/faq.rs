use serde::{Deserialize, Serialize};

use super::template::fill;
use super::ContentContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqSection {
    pub title: String,
    pub faqs: Vec<Faq>,
    pub schema: FaqSchema,
}

/// schema.org FAQPage structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqSchema {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "mainEntity")]
    pub main_entity: Vec<SchemaQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaQuestion {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    #[serde(rename = "acceptedAnswer")]
    pub accepted_answer: SchemaAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaAnswer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub text: String,
}

enum Targets {
    Primary,
    Secondary(&'static [&'static str]),
    Fixed(&'static [&'static str]),
}

struct FaqTemplate {
    question: &'static str,
    answer: &'static str,
    targets: Targets,
}

const FAQS: &[FaqTemplate] = &[
    FaqTemplate {
        question: "What is {name} and how does it work?",
        answer: "{name} is a {category_lower} solution. {description} It combines an intuitive design with capable AI features to deliver results for professionals and businesses.",
        targets: Targets::Primary,
    },
    FaqTemplate {
        question: "How much does {name} cost?",
        answer: "{name} offers multiple pricing tiers, typically starting with a free or starter plan. Professional plans add advanced features, and enterprise pricing depends on requirements. See our {name} pricing analysis for current rates.",
        targets: Targets::Secondary(&["pricing"]),
    },
    FaqTemplate {
        question: "What are the best {name} alternatives?",
        answer: "Popular {name} alternatives include other leading {category_lower} tools, each with its own strengths. The best choice depends on your requirements, budget, and technical needs. Our comparison guide ranks alternatives on features, pricing, and user experience.",
        targets: Targets::Secondary(&["alternatives", "vs"]),
    },
    FaqTemplate {
        question: "Is {name} suitable for beginners?",
        answer: "Yes. {name} is designed with user experience in mind, with an intuitive interface and thorough documentation. Most users can start with the basics right away, while advanced capabilities leave room to grow.",
        targets: Targets::Secondary(&["tutorial", "how to"]),
    },
    FaqTemplate {
        question: "What kind of support does {name} provide?",
        answer: "{name} offers documentation, tutorials, community forums, and direct customer support. Premium plans usually include priority support with faster response times.",
        targets: Targets::Fixed(&["support", "help", "customer service"]),
    },
];

pub fn faq_section(ctx: &ContentContext) -> FaqSection {
    let faqs: Vec<Faq> = FAQS
        .iter()
        .map(|t| Faq {
            question: fill(t.question, ctx),
            answer: fill(t.answer, ctx),
            keywords: targets(ctx, &t.targets),
        })
        .collect();

    FaqSection {
        title: format!("Frequently Asked Questions About {}", ctx.name()),
        schema: schema(&faqs),
        faqs,
    }
}

fn targets(ctx: &ContentContext, t: &Targets) -> Vec<String> {
    match t {
        Targets::Primary => vec![ctx.primary_keyword().to_string()],
        Targets::Secondary(needles) => ctx
            .selection
            .secondary
            .iter()
            .filter(|k| needles.iter().any(|n| k.keyword.contains(n)))
            .map(|k| k.keyword.clone())
            .collect(),
        Targets::Fixed(words) => words.iter().map(|w| w.to_string()).collect(),
    }
}

/// One schema question per FAQ, text copied verbatim.
pub fn schema(faqs: &[Faq]) -> FaqSchema {
    FaqSchema {
        context: "https://schema.org".to_string(),
        kind: "FAQPage".to_string(),
        main_entity: faqs
            .iter()
            .map(|f| SchemaQuestion {
                kind: "Question".to_string(),
                name: f.question.clone(),
                accepted_answer: SchemaAnswer {
                    kind: "Answer".to_string(),
                    text: f.answer.clone(),
                },
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Site;
    use crate::content::tests::acme_selection;

    fn section() -> FaqSection {
        let sel = acme_selection();
        let site = Site::default();
        faq_section(&ContentContext::new(&sel.tool, &sel, &site))
    }

    #[test]
    fn five_questions() {
        let s = section();
        assert_eq!(s.faqs.len(), 5);
        assert_eq!(s.faqs[0].question, "What is Acme and how does it work?");
        assert_eq!(s.title, "Frequently Asked Questions About Acme");
    }

    #[test]
    fn schema_mirrors_faqs() {
        let s = section();
        assert_eq!(s.schema.main_entity.len(), s.faqs.len());
        for (q, f) in s.schema.main_entity.iter().zip(&s.faqs) {
            assert_eq!(q.name, f.question);
            assert_eq!(q.accepted_answer.text, f.answer);
        }
    }

    #[test]
    fn schema_json_shape() {
        let v = serde_json::to_value(section().schema).unwrap();
        assert_eq!(v["@type"], "FAQPage");
        assert_eq!(v["mainEntity"][0]["@type"], "Question");
        assert_eq!(v["mainEntity"][0]["acceptedAnswer"]["@type"], "Answer");
    }

    #[test]
    fn keyword_targets() {
        let s = section();
        assert_eq!(s.faqs[0].keywords, vec!["acme review"]);
        assert_eq!(s.faqs[1].keywords, vec!["acme pricing"]);
        assert_eq!(s.faqs[2].keywords, vec!["acme alternatives"]);
        assert_eq!(s.faqs[3].keywords, vec!["acme tutorial"]);
        assert_eq!(s.faqs[4].keywords, vec!["support", "help", "customer service"]);
    }
}
