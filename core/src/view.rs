//! Derived views over a fetched catalog snapshot.

use std::time::Instant;

use serde::Serialize;

use crate::catalog::{Tool, ToolId, category_filter, category_matches};
use crate::toggle::{FavoriteToggles, RequestFailure, ToggleError, ToggleState};

/// Narrow `tools` by category, then by search term. Both are optional; an
/// empty or blank category means no filter. Input order is preserved.
///
/// The search term matches when it is a case-insensitive substring of the
/// name, category, excerpt, or any tag.
pub fn filter_tools<'a>(tools: &'a [Tool], category: Option<&str>, search: &str) -> Vec<&'a Tool> {
    let category = category_filter(category);
    let search = search.to_lowercase();

    tools
        .iter()
        .filter(|tool| category.is_none_or(|c| category_matches(&tool.category, c)))
        .filter(|tool| search.is_empty() || matches_search(tool, &search))
        .collect()
}

fn matches_search(tool: &Tool, needle: &str) -> bool {
    tool.name.to_lowercase().contains(needle)
        || tool.category.to_lowercase().contains(needle)
        || tool.excerpt.to_lowercase().contains(needle)
        || tool.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Summary statistics over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_tools: usize,
    pub category_count: usize,
    /// Category with the most tools. On a tie, the category whose first tool
    /// appears earliest in the snapshot wins.
    pub top_category: Option<String>,
    /// Tools per category, rounded half away from zero
    pub average_per_category: usize,
    /// Per-category counts, highest first, ties in first-seen order
    pub by_category: Vec<CategoryCount>,
}

impl CatalogStats {
    pub fn compute(tools: &[Tool]) -> Self {
        let mut by_category: Vec<CategoryCount> = Vec::new();
        for tool in tools {
            match by_category.iter_mut().find(|c| c.category == tool.category) {
                Some(entry) => entry.count += 1,
                None => by_category.push(CategoryCount {
                    category: tool.category.clone(),
                    count: 1,
                }),
            }
        }
        // stable: equal counts keep first-seen order
        by_category.sort_by(|a, b| b.count.cmp(&a.count));

        let category_count = by_category.len();
        let average_per_category = if category_count == 0 {
            0
        } else {
            (tools.len() as f64 / category_count as f64).round() as usize
        };

        Self {
            total_tools: tools.len(),
            category_count,
            top_category: by_category.first().map(|c| c.category.clone()),
            average_per_category,
            by_category,
        }
    }
}

/// Client-side state container: catalog snapshot, filters and favorite
/// toggles. Everything the client renders is derived from this.
#[derive(Debug, Default)]
pub struct ViewModel {
    tools: Vec<Tool>,
    categories: Vec<String>,
    search: String,
    category: Option<String>,
    toggles: FavoriteToggles,
}

impl ViewModel {
    pub fn new(
        tools: Vec<Tool>,
        categories: Vec<String>,
        favorite_ids: impl IntoIterator<Item = ToolId>,
    ) -> Self {
        Self {
            tools,
            categories,
            toggles: FavoriteToggles::with_mirror(favorite_ids),
            ..Self::default()
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn tool(&self, id: ToolId) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn select_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| category_filter(Some(c.as_str())).is_some());
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.category = None;
    }

    pub fn visible(&self) -> Vec<&Tool> {
        filter_tools(&self.tools, self.category.as_deref(), &self.search)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::compute(&self.tools)
    }

    /// One-line description of the current view, e.g.
    /// `Showing 2 of 20 tools in Writing matching "grammar"`.
    pub fn summary(&self) -> String {
        let visible = self.visible().len();
        let total = self.tools.len();
        let mut line = if visible == total {
            format!("Showing all {total} tools")
        } else {
            format!("Showing {visible} of {total} tools")
        };
        if let Some(category) = &self.category {
            line.push_str(&format!(" in {category}"));
        }
        if !self.search.is_empty() {
            line.push_str(&format!(" matching \"{}\"", self.search));
        }
        line
    }

    pub fn toggles(&self) -> &FavoriteToggles {
        &self.toggles
    }

    pub fn is_favorite(&self, id: ToolId) -> bool {
        self.toggles.is_favorite(id)
    }

    pub fn favorite_state(&self, id: ToolId) -> ToggleState {
        self.toggles.state(id)
    }

    pub fn begin_add(&mut self, id: ToolId, now: Instant) -> Result<(), ToggleError> {
        let name = self
            .tool(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("Tool {id}"));
        self.toggles.begin_add(id, &name, now)
    }

    pub fn complete_add(
        &mut self,
        id: ToolId,
        outcome: Result<(), RequestFailure>,
        now: Instant,
    ) -> Result<ToggleState, ToggleError> {
        self.toggles.complete_add(id, outcome, now)
    }

    pub fn begin_remove(&mut self, id: ToolId) -> Result<(), ToggleError> {
        self.toggles.begin_remove(id)
    }

    pub fn complete_remove(
        &mut self,
        id: ToolId,
        outcome: Result<(), RequestFailure>,
        now: Instant,
    ) -> Result<ToggleState, ToggleError> {
        self.toggles.complete_remove(id, outcome, now)
    }

    pub fn tick(&mut self, now: Instant) {
        self.toggles.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::catalog::tests::tool;

    fn seed() -> Vec<Tool> {
        Catalog::seed().tools().to_vec()
    }

    #[test]
    fn search_matches_any_of_four_fields() {
        let tools = seed();
        let hits = filter_tools(&tools, None, "code");
        assert!(!hits.is_empty());
        for tool in &hits {
            let needle = "code";
            let matched = tool.name.to_lowercase().contains(needle)
                || tool.category.to_lowercase().contains(needle)
                || tool.excerpt.to_lowercase().contains(needle)
                || tool.tags.iter().any(|t| t.to_lowercase().contains(needle));
            assert!(matched, "{} should not match", tool.name);
        }

        let missed: Vec<&Tool> = tools
            .iter()
            .filter(|t| !hits.iter().any(|h| h.id == t.id))
            .collect();
        for tool in missed {
            assert!(!matches_search(tool, "code"), "{} was dropped", tool.name);
        }
    }

    #[test]
    fn search_hits_on_tag_only() {
        let tools = vec![
            tool(1, "Alpha", "Misc", &["Transcription"]),
            tool(2, "Beta", "Misc", &["Video"]),
        ];
        let hits = filter_tools(&tools, None, "TRANSCRIPT");
        assert_eq!(hits.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn category_and_search_combine() {
        let tools = seed();
        let hits = filter_tools(&tools, Some("Writing"), "grammar");
        assert_eq!(hits.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["Grammarly"]);
        assert!(hits.iter().all(|t| t.category == "Writing"));
    }

    #[test]
    fn empty_filters_keep_order() {
        let tools = seed();
        let hits = filter_tools(&tools, Some(""), "");
        let ids: Vec<ToolId> = hits.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn client_and_server_category_filters_agree() {
        let catalog = Catalog::seed();
        for category in [" Coding ", "coding", "   ", "", "Cooking"] {
            let server: Vec<ToolId> = catalog.list_tools(Some(category)).iter().map(|t| t.id).collect();
            let client: Vec<ToolId> = filter_tools(catalog.tools(), Some(category), "")
                .iter()
                .map(|t| t.id)
                .collect();
            assert_eq!(server, client, "category {category:?}");
        }
        assert!(filter_tools(catalog.tools(), Some(" Coding "), "").is_empty());
    }

    #[test]
    fn stats_over_seed_catalog() {
        let stats = CatalogStats::compute(&seed());
        assert_eq!(stats.total_tools, 20);
        assert_eq!(stats.category_count, 8);
        assert_eq!(stats.top_category.as_deref(), Some("Writing"));
        assert_eq!(stats.by_category[0].count, 5);
        // 20 / 8 = 2.5
        assert_eq!(stats.average_per_category, 3);
    }

    #[test]
    fn stats_tie_goes_to_first_seen_category() {
        let tools = vec![
            tool(1, "A", "Video", &[]),
            tool(2, "B", "Audio", &[]),
            tool(3, "C", "Audio", &[]),
            tool(4, "D", "Video", &[]),
        ];
        let stats = CatalogStats::compute(&tools);
        assert_eq!(stats.top_category.as_deref(), Some("Video"));
        assert_eq!(stats.average_per_category, 2);
    }

    #[test]
    fn stats_of_empty_snapshot() {
        let stats = CatalogStats::compute(&[]);
        assert_eq!(stats.total_tools, 0);
        assert_eq!(stats.category_count, 0);
        assert_eq!(stats.top_category, None);
        assert_eq!(stats.average_per_category, 0);
    }

    #[test]
    fn view_model_summary_reflects_filters() {
        let mut view = ViewModel::new(seed(), Catalog::seed().categories(), Vec::<ToolId>::new());
        assert_eq!(view.summary(), "Showing all 20 tools");

        view.select_category(Some("Writing".to_string()));
        view.set_search("grammar");
        assert_eq!(view.summary(), "Showing 1 of 20 tools in Writing matching \"grammar\"");

        view.clear_filters();
        assert_eq!(view.visible().len(), 20);
    }

    #[test]
    fn view_model_drives_toggles_by_tool_name() {
        let now = Instant::now();
        let mut view = ViewModel::new(seed(), Vec::new(), [1]);
        let err = view.begin_add(1, now).unwrap_err();
        assert!(err.to_string().contains("ChatGPT"));

        view.begin_add(2, now).unwrap();
        assert_eq!(view.complete_add(2, Ok(()), now), Ok(ToggleState::Favorited));
        assert!(view.is_favorite(2));
    }

    #[test]
    fn failed_remove_settles_back_to_favorited_after_notice() {
        let now = Instant::now();
        let mut view = ViewModel::new(seed(), Vec::new(), [3]);
        view.begin_remove(3).unwrap();
        assert_eq!(
            view.complete_remove(3, Err(RequestFailure::Other), now),
            Ok(ToggleState::Error)
        );
        assert_eq!(view.favorite_state(3), ToggleState::Error);

        view.tick(now + crate::toggle::NOTICE_TTL);
        assert_eq!(view.favorite_state(3), ToggleState::Favorited);
        assert!(view.toggles().notice(now + crate::toggle::NOTICE_TTL).is_none());
    }

    #[test]
    fn blank_category_selection_is_no_filter() {
        let mut view = ViewModel::new(seed(), Catalog::seed().categories(), Vec::<ToolId>::new());
        assert_eq!(view.categories().len(), 8);
        view.select_category(Some("  ".to_string()));
        assert_eq!(view.summary(), "Showing all 20 tools");
    }
}
