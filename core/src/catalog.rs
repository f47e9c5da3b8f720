use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Identity of a tool record. Always positive.
pub type ToolId = u32;

/// Pricing tier of a tool.
///
/// Serialized as the bare tier name (`"Free"`, `"Freemium"`, `"Paid"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Pricing {
    Free,
    Freemium,
    Paid,
}

impl Pricing {
    pub fn as_str(self) -> &'static str {
        match self {
            Pricing::Free => "Free",
            Pricing::Freemium => "Freemium",
            Pricing::Paid => "Paid",
        }
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single catalog entry. Records are created once at startup and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    /// Free-text label, matched case-insensitively
    pub category: String,
    pub url: String,
    /// Short description shown on the tool card
    pub excerpt: String,
    pub tags: Vec<String>,
    pub pricing: Pricing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("tool id must be positive (tool '{name}')")]
    ZeroId { name: String },
    #[error("duplicate tool id {id}")]
    DuplicateId { id: ToolId },
}

/// The immutable, seed-loaded list of tools.
#[derive(Debug, Clone)]
pub struct Catalog {
    tools: Vec<Tool>,
}

impl Catalog {
    /// Build a catalog, rejecting zero or duplicate ids.
    pub fn new(tools: Vec<Tool>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(tools.len());
        for tool in &tools {
            if tool.id == 0 {
                return Err(CatalogError::ZeroId {
                    name: tool.name.clone(),
                });
            }
            if !seen.insert(tool.id) {
                return Err(CatalogError::DuplicateId { id: tool.id });
            }
        }
        Ok(Self { tools })
    }

    /// The twenty tools the service ships with.
    pub fn seed() -> Self {
        let tools = SEED
            .iter()
            .map(|s| Tool {
                id: s.id,
                name: s.name.to_string(),
                category: s.category.to_string(),
                url: s.url.to_string(),
                excerpt: s.excerpt.to_string(),
                tags: s.tags.iter().map(|t| t.to_string()).collect(),
                pricing: s.pricing,
            })
            .collect();
        Self { tools }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn find(&self, id: ToolId) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// All tools, or only those in `category` (case-insensitive).
    /// A blank category counts as no filter. Seed order is kept.
    pub fn list_tools(&self, category: Option<&str>) -> Vec<Tool> {
        match category_filter(category) {
            Some(category) => self
                .tools
                .iter()
                .filter(|t| category_matches(&t.category, category))
                .cloned()
                .collect(),
            None => self.tools.clone(),
        }
    }

    /// Distinct categories, sorted ascending.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .tools
            .iter()
            .map(|t| t.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();
        categories
    }
}

/// The category to filter by, or `None` when `category` is empty or only
/// whitespace. A non-blank value is returned untrimmed.
pub fn category_filter(category: Option<&str>) -> Option<&str> {
    category.filter(|c| !c.trim().is_empty())
}

/// Case-insensitive category comparison shared by the service and the client.
pub fn category_matches(category: &str, wanted: &str) -> bool {
    category.to_lowercase() == wanted.to_lowercase()
}

struct SeedTool {
    id: ToolId,
    name: &'static str,
    category: &'static str,
    url: &'static str,
    excerpt: &'static str,
    tags: &'static [&'static str],
    pricing: Pricing,
}

const SEED: &[SeedTool] = &[
    SeedTool {
        id: 1,
        name: "ChatGPT",
        category: "Writing",
        url: "https://chat.openai.com",
        excerpt: "Advanced conversational AI for content creation, research, and brainstorming.",
        tags: &["AI Assistant", "Chatbot", "Content Generation"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 2,
        name: "Claude",
        category: "Writing",
        url: "https://claude.ai",
        excerpt: "Anthropic's AI assistant for writing, analysis, and complex reasoning tasks.",
        tags: &["AI Assistant", "Analysis", "Reasoning"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 3,
        name: "DALL-E 3",
        category: "Image Generation",
        url: "https://openai.com/dall-e-3",
        excerpt: "State-of-the-art AI image generator from text descriptions.",
        tags: &["Image Generation", "Creative", "Art"],
        pricing: Pricing::Paid,
    },
    SeedTool {
        id: 4,
        name: "Midjourney",
        category: "Image Generation",
        url: "https://midjourney.com",
        excerpt: "Professional AI art generator known for high-quality, artistic images.",
        tags: &["Image Generation", "Art", "Professional"],
        pricing: Pricing::Paid,
    },
    SeedTool {
        id: 5,
        name: "GitHub Copilot",
        category: "Coding",
        url: "https://github.com/features/copilot",
        excerpt: "AI pair programmer that helps you write code faster with intelligent suggestions.",
        tags: &["Code Assistant", "Programming", "Productivity"],
        pricing: Pricing::Paid,
    },
    SeedTool {
        id: 6,
        name: "Cursor",
        category: "Coding",
        url: "https://cursor.sh",
        excerpt: "AI-powered code editor built for pair programming with AI.",
        tags: &["Code Editor", "AI Integration", "Development"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 7,
        name: "Grammarly",
        category: "Writing",
        url: "https://grammarly.com",
        excerpt: "AI writing assistant for grammar, style, and tone improvement.",
        tags: &["Writing Assistant", "Grammar", "Style"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 8,
        name: "Notion AI",
        category: "Productivity",
        url: "https://notion.so/ai",
        excerpt: "AI features integrated into Notion for content creation and organization.",
        tags: &["Productivity", "Organization", "Content"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 9,
        name: "Loom AI",
        category: "Video",
        url: "https://loom.com",
        excerpt: "AI-powered video creation and editing for screen recordings and presentations.",
        tags: &["Video", "Screen Recording", "Presentations"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 10,
        name: "RunwayML",
        category: "Video",
        url: "https://runwayml.com",
        excerpt: "Advanced AI video generation and editing tools for creators.",
        tags: &["Video Generation", "Editing", "Creative"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 11,
        name: "Perplexity",
        category: "Research",
        url: "https://perplexity.ai",
        excerpt: "AI-powered search engine that provides detailed answers with citations.",
        tags: &["Search", "Research", "Citations"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 12,
        name: "Jasper",
        category: "Writing",
        url: "https://jasper.ai",
        excerpt: "AI content creation platform for marketing copy and business writing.",
        tags: &["Marketing", "Content Creation", "Business"],
        pricing: Pricing::Paid,
    },
    SeedTool {
        id: 13,
        name: "Copy.ai",
        category: "Writing",
        url: "https://copy.ai",
        excerpt: "AI copywriting tool for marketing content, emails, and social media.",
        tags: &["Copywriting", "Marketing", "Social Media"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 14,
        name: "Stable Diffusion",
        category: "Image Generation",
        url: "https://stability.ai",
        excerpt: "Open-source AI image generator with customizable models and fine-tuning.",
        tags: &["Open Source", "Customizable", "Image Generation"],
        pricing: Pricing::Free,
    },
    SeedTool {
        id: 15,
        name: "Eleven Labs",
        category: "Audio",
        url: "https://elevenlabs.io",
        excerpt: "AI voice generation and cloning for realistic speech synthesis.",
        tags: &["Voice Generation", "Audio", "Speech"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 16,
        name: "Zapier AI",
        category: "Productivity",
        url: "https://zapier.com/ai",
        excerpt: "AI-powered automation for connecting apps and streamlining workflows.",
        tags: &["Automation", "Workflows", "Integration"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 17,
        name: "Replit AI",
        category: "Coding",
        url: "https://replit.com",
        excerpt: "AI coding assistant integrated into cloud development environment.",
        tags: &["Cloud IDE", "Code Assistant", "Collaboration"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 18,
        name: "Synthesia",
        category: "Video",
        url: "https://synthesia.io",
        excerpt: "AI video generation with realistic avatars for training and marketing content.",
        tags: &["AI Avatars", "Training", "Marketing"],
        pricing: Pricing::Paid,
    },
    SeedTool {
        id: 19,
        name: "Otter.ai",
        category: "Audio",
        url: "https://otter.ai",
        excerpt: "AI meeting transcription and note-taking for better collaboration.",
        tags: &["Transcription", "Meetings", "Note-taking"],
        pricing: Pricing::Freemium,
    },
    SeedTool {
        id: 20,
        name: "Canva AI",
        category: "Design",
        url: "https://canva.com",
        excerpt: "AI-powered design tools for creating graphics, presentations, and marketing materials.",
        tags: &["Design", "Graphics", "Templates"],
        pricing: Pricing::Freemium,
    },
];
