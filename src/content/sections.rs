use serde::{Deserialize, Serialize};

use super::template::fill;
use super::ContentContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub id: String,
    pub heading: String,
    pub keyword_target: Option<String>,
    pub body: String,
}

/// A body section shown when a secondary keyword contains one of
/// `matchers`. An empty matcher list means the section is always shown.
struct SectionTemplate {
    id: &'static str,
    matchers: &'static [&'static str],
    heading: &'static str,
    body: &'static str,
}

const HERO: &str = "# {keyword_title}

Looking for a comprehensive {keyword}? You've come to the right place. {name} has emerged as a leading {category_lower} solution, helping businesses streamline their workflows and boost productivity.

{description} Whether you're a small business owner, an enterprise team, or an individual professional, understanding {name}'s capabilities is crucial for making an informed decision.

In this detailed {keyword}, we dive into {name}'s key features, pricing structure, real-world use cases, and how it stacks up against competitors in the {category} space. Our analysis covers everything from performance to user experience, giving you the insight needed to decide whether {name} fits your requirements.

**What you'll discover:**
- A feature-by-feature breakdown of capabilities
- Pricing analysis and value assessment
- Real-world use cases and implementation examples
- Honest pros and cons
- Side-by-side comparisons with top alternatives

Let's explore why {name} might be the {category_lower} solution you've been searching for.";

const SECTIONS: &[SectionTemplate] = &[
    SectionTemplate {
        id: "features",
        matchers: &["features"],
        heading: "{name} Key Features & Capabilities",
        body: "When evaluating {name}, understanding its core features is essential for determining fit. Several capabilities set {name} apart in the {category} market.

### Core Features Overview
{name} offers a broad suite of features designed for {category_lower} applications:

**Primary Capabilities:**
- **AI Integration**: Applies current AI models to everyday {category_lower} work
- **Intuitive Interface**: A clean, modern design that keeps the learning curve short
- **Scalable Architecture**: Built to grow with your business needs
- **Real-time Collaboration**: Team features for shared workflows

**Advanced Features:**
- **Custom Workflows**: Tailor processes to your specific requirements
- **Integration Ecosystem**: Connect with popular tools and platforms
- **Analytics & Reporting**: Insight into usage and performance
- **Enterprise Security**: Encryption and compliance controls

### Performance
{name} delivers consistent performance across typical use cases, placing it among the stronger {category_lower} solutions available today.",
    },
    SectionTemplate {
        id: "pricing",
        matchers: &["pricing"],
        heading: "{name} Pricing Plans & Value Analysis",
        body: "Understanding {name} pricing is crucial for budget planning and ROI assessment. Here is how the plans break down.

### Pricing Structure Overview
{name} offers tiered pricing for different business needs and budgets:

**Plan Comparison:**
- **Free/Starter Plan**: For individuals and small teams getting started
- **Professional Plan**: Advanced features for growing businesses
- **Enterprise Plan**: Full feature set with premium support and customization
- **Custom Solutions**: Tailored packages for large organizations

### Value Assessment
**Cost-Benefit Factors:**
- **Implementation Time**: Faster setup reduces onboarding costs
- **Feature Utilization**: Make sure you will use enough of the plan to justify it
- **Scalability**: Plans that grow with you prevent costly migrations
- **Support Quality**: Premium support saves time when issues arise

### Pricing Comparison
Compared to alternatives in the {category} space, {name} offers competitive value. It is not always the cheapest option, but its feature-to-price ratio ranks well.",
    },
    SectionTemplate {
        id: "use-cases",
        matchers: &["use cases", "business"],
        heading: "Real-World {name} Use Cases & Applications",
        body: "Seeing how {name} performs in real-world scenarios helps estimate its impact on your own work.

### Primary Use Cases

**Enterprise Implementation:**
Large organizations use {name} for complex workflows that need scalability and security, with user management and custom integrations.

**Team Collaboration:**
Cross-functional teams use {name} to streamline communication and project management through shared workspaces.

**Automation & Efficiency:**
Businesses use {name} to automate repetitive tasks and cut manual work.

### Industry-Specific Applications

**{category} Sector:**
Within {category_lower}, {name} addresses workflow optimization, resource management, and performance tracking.

**Professional Services:**
Agencies and consultancies use {name} to manage client projects and deliver consistent results.",
    },
    SectionTemplate {
        id: "pros-cons",
        matchers: &[],
        heading: "{name} Pros and Cons: Honest Assessment",
        body: "Every tool has strengths and limitations. Here is where {name} shines and where it falls short.

### Advantages

**Key Strengths:**
- **User Experience**: An intuitive interface reduces training time
- **Feature Completeness**: A broad toolset that replaces several point solutions
- **Performance**: Reliable even with large workloads
- **Integration**: A healthy ecosystem of integrations and API access
- **Scalability**: Works for small teams and enterprise deployments alike

### Limitations

**Areas for Improvement:**
- **Learning Curve**: Advanced features may need training
- **Pricing**: Premium tiers can be expensive for smaller organizations
- **Customization**: Some options require technical expertise
- **Mobile Experience**: The mobile app may trail the desktop version

### Overall Assessment
{name} is a strong choice in the {category} category. For most use cases its advantages outweigh its limitations, making it a top contender for businesses seeking {category_lower} solutions.",
    },
];

pub fn hero(ctx: &ContentContext) -> String {
    fill(HERO, ctx)
}

/// Topical sections gated on the secondary keywords; pros and cons always.
pub fn main_sections(ctx: &ContentContext) -> Vec<ContentSection> {
    SECTIONS
        .iter()
        .filter_map(|t| {
            let keyword_target = if t.matchers.is_empty() {
                None
            } else {
                Some(ctx.selection.find_secondary(t.matchers)?.keyword.clone())
            };
            Some(ContentSection {
                id: t.id.to_string(),
                heading: fill(t.heading, ctx),
                keyword_target,
                body: fill(t.body, ctx),
            })
        })
        .collect()
}
