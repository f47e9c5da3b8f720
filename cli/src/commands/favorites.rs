use std::time::Instant;

use clap::Subcommand;

use toolshelf_core::catalog::ToolId;
use toolshelf_core::toggle::{NOTICE_TTL, ToggleError, ToggleState};
use toolshelf_core::view::ViewModel;

use crate::client::{ApiClient, ClientError};
use crate::commands::catalog::load_view;
use crate::util::{print_client_error, print_ok};

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List favorited tools
    List,
    /// Add a tool to favorites
    Add {
        /// Tool ID
        tool_id: ToolId,
    },
    /// Remove a tool from favorites
    Remove {
        /// Tool ID
        tool_id: ToolId,
    },
}

pub async fn run(client: &ApiClient, command: FavoritesCommands) -> i32 {
    match command {
        FavoritesCommands::List => match client.favorites().await {
            Ok(tools) => print_ok(&tools),
            Err(e) => print_client_error(&e),
        },
        FavoritesCommands::Add { tool_id } => add(client, tool_id).await,
        FavoritesCommands::Remove { tool_id } => remove(client, tool_id).await,
    }
}

async fn online_view(client: &ApiClient) -> Result<ViewModel, i32> {
    match load_view(client).await {
        Ok((view, false)) => Ok(view),
        Ok((_, true)) => {
            eprintln!("Backend not available; favorites cannot be changed offline.");
            Err(3)
        }
        Err(e) => Err(print_client_error(&e)),
    }
}

async fn add(client: &ApiClient, tool_id: ToolId) -> i32 {
    let mut view = match online_view(client).await {
        Ok(view) => view,
        Err(code) => return code,
    };

    if let Err(e) = view.begin_add(tool_id, Instant::now()) {
        return refuse(&e);
    }

    let result = client.add_favorite(tool_id).await;
    let outcome = result.as_ref().map(|_| ()).map_err(ClientError::to_request_failure);
    let state = view.complete_add(tool_id, outcome, Instant::now());
    settle(&mut view, tool_id, state, result)
}

async fn remove(client: &ApiClient, tool_id: ToolId) -> i32 {
    let mut view = match online_view(client).await {
        Ok(view) => view,
        Err(code) => return code,
    };

    if let Err(e) = view.begin_remove(tool_id) {
        return refuse(&e);
    }

    let result = client.remove_favorite(tool_id).await;
    let outcome = result.as_ref().map(|_| ()).map_err(ClientError::to_request_failure);
    let state = view.complete_remove(tool_id, outcome, Instant::now());
    settle(&mut view, tool_id, state, result)
}

fn refuse(err: &ToggleError) -> i32 {
    eprintln!("{err}");
    1
}

/// Report the outcome of a toggle. On failure the notice is printed, then
/// the view is advanced past the notice lifetime so the logged state is the
/// one the tool settles into.
fn settle<T: serde::Serialize>(
    view: &mut ViewModel,
    tool_id: ToolId,
    state: Result<ToggleState, ToggleError>,
    result: Result<T, ClientError>,
) -> i32 {
    match (state, result) {
        (Ok(ToggleState::Error), Err(e)) => {
            let now = Instant::now();
            if let Some(notice) = view.toggles().notice(now) {
                eprintln!("{}", notice.message);
            }
            view.tick(now + NOTICE_TTL);
            tracing::debug!(
                error = %e,
                tool_id,
                settled = ?view.favorite_state(tool_id),
                "Favorite request failed"
            );
            e.exit_code()
        }
        (Ok(_), Ok(ack)) => print_ok(&ack),
        (Ok(_), Err(e)) => print_client_error(&e),
        (Err(e), _) => refuse(&e),
    }
}
