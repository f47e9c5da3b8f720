use serde::Serialize;

use toolshelf_core::catalog::{Catalog, Tool, ToolId};
use toolshelf_core::view::ViewModel;

use crate::client::{ApiClient, ClientError};
use crate::util::{print_client_error, print_ok};

/// Fetch the catalog snapshot, category list and favorite mirror.
///
/// When the API cannot be reached the built-in seed catalog is used instead,
/// with an empty favorite mirror. The second value is `true` in that case.
pub async fn load_view(client: &ApiClient) -> Result<(ViewModel, bool), ClientError> {
    let tools = match client.tools(None).await {
        Ok(tools) => tools,
        Err(e) if e.is_unreachable() => {
            tracing::warn!(api_url = client.base_url(), error = %e, "API unreachable, using built-in catalog");
            let seed = Catalog::seed();
            let view = ViewModel::new(seed.tools().to_vec(), seed.categories(), Vec::<ToolId>::new());
            return Ok((view, true));
        }
        Err(e) => return Err(e),
    };
    let (categories, favorites) = tokio::try_join!(client.categories(), client.favorites())?;
    let view = ViewModel::new(tools, categories, favorites.iter().map(|t| t.id));
    Ok((view, false))
}

#[derive(Serialize)]
struct ToolRow<'a> {
    #[serde(flatten)]
    tool: &'a Tool,
    favorite: bool,
}

pub async fn tools(
    client: &ApiClient,
    category: Option<String>,
    search: Option<String>,
    json: bool,
) -> i32 {
    let (mut view, offline) = match load_view(client).await {
        Ok(loaded) => loaded,
        Err(e) => return print_client_error(&e),
    };
    if offline {
        eprintln!("Backend not available, showing the built-in catalog.");
    }

    view.select_category(category);
    view.set_search(search.unwrap_or_default());
    let visible = view.visible();

    if json {
        let rows: Vec<ToolRow<'_>> = visible
            .iter()
            .map(|tool| ToolRow {
                tool,
                favorite: view.is_favorite(tool.id),
            })
            .collect();
        return print_ok(&rows);
    }

    if visible.is_empty() {
        println!("No tools match your current filters. Try adjusting your search or category selection.");
    }
    for tool in &visible {
        println!("{}", render_tool(tool, view.is_favorite(tool.id)));
    }
    println!("{}", view.summary());
    0
}

pub async fn categories(client: &ApiClient) -> i32 {
    match load_view(client).await {
        Ok((view, offline)) => {
            if offline {
                eprintln!("Backend not available, showing the built-in categories.");
            }
            print_ok(&view.categories())
        }
        Err(e) => print_client_error(&e),
    }
}

pub async fn stats(client: &ApiClient) -> i32 {
    match load_view(client).await {
        Ok((view, offline)) => {
            if offline {
                eprintln!("Backend not available, showing stats for the built-in catalog.");
            }
            print_ok(&view.stats())
        }
        Err(e) => print_client_error(&e),
    }
}

fn render_tool(tool: &Tool, favorite: bool) -> String {
    let marker = if favorite { '*' } else { ' ' };
    format!(
        "{marker} {:>3}  {} [{}] {}\n        {}\n        {}  tags: {}",
        tool.id,
        tool.name,
        tool.category,
        tool.pricing,
        tool.excerpt,
        tool.url,
        tool.tags.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_marks_favorites() {
        let catalog = Catalog::seed();
        let tool = catalog.find(7).unwrap();
        let line = render_tool(tool, true);
        assert!(line.starts_with("*   7  Grammarly [Writing] Freemium"));
        assert!(line.contains("tags: Writing Assistant, Grammar, Style"));
        assert!(render_tool(tool, false).starts_with("    7"));
    }

    #[test]
    fn tool_row_flattens_record() {
        let catalog = Catalog::seed();
        let row = ToolRow {
            tool: catalog.find(1).unwrap(),
            favorite: true,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "ChatGPT");
        assert_eq!(json["favorite"], true);
    }

    #[tokio::test]
    async fn unreachable_api_loads_the_built_in_catalog() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}/api"), crate::client::DEFAULT_TIMEOUT).unwrap();
        let (view, offline) = load_view(&client).await.expect("falls back offline");
        assert!(offline);
        assert_eq!(view.categories(), Catalog::seed().categories().as_slice());
        assert_eq!(view.tools().len(), 20);
        assert!(!view.is_favorite(1));
    }
}
