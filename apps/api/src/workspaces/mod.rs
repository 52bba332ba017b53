// Workspace directory and switching. Workspaces live in EmailBison; we layer
// slug resolution and the per-session active-workspace pointer on top.

pub mod handlers;
pub mod slug;

use crate::clients::emailbison::Workspace;
use crate::errors::AppError;
use crate::state::AppState;

/// Resolves a `:slug` path segment to its workspace via the EmailBison
/// directory. Unresolvable slugs are a 404.
pub async fn resolve_workspace(state: &AppState, slug: &str) -> Result<Workspace, AppError> {
    let workspaces = state.bison.list_workspaces().await?;
    slug::match_workspace(&workspaces, slug)
        .ok_or_else(|| AppError::NotFound(format!("No workspace matches '{slug}'")))
}
