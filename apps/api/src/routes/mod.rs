pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::bookings::handlers as booking_handlers;
use crate::campaigns::handlers as campaign_handlers;
use crate::companies::handlers as company_handlers;
use crate::email_accounts::handlers as email_account_handlers;
use crate::leadlists::handlers as lead_list_handlers;
use crate::people::handlers as person_handlers;
use crate::replies::handlers as reply_handlers;
use crate::state::AppState;
use crate::workspaces::handlers as workspace_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/login", post(auth_handlers::handle_login))
        .route("/api/v1/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/v1/auth/me", get(auth_handlers::handle_me))
        // Workspaces (EmailBison directory + slug resolution)
        .route(
            "/api/v1/workspaces",
            get(workspace_handlers::handle_list_workspaces)
                .post(workspace_handlers::handle_create_workspace),
        )
        .route(
            "/api/v1/workspaces/:slug",
            get(workspace_handlers::handle_get_workspace),
        )
        .route(
            "/api/v1/workspaces/:slug/activate",
            post(workspace_handlers::handle_activate_workspace),
        )
        // Campaigns (EmailBison)
        .route(
            "/api/v1/workspaces/:slug/campaigns",
            get(campaign_handlers::handle_list_campaigns)
                .post(campaign_handlers::handle_create_campaign),
        )
        .route(
            "/api/v1/workspaces/:slug/campaigns/:id",
            get(campaign_handlers::handle_get_campaign)
                .patch(campaign_handlers::handle_update_campaign),
        )
        .route(
            "/api/v1/workspaces/:slug/campaigns/:id/pause",
            post(campaign_handlers::handle_pause_campaign),
        )
        .route(
            "/api/v1/workspaces/:slug/campaigns/:id/resume",
            post(campaign_handlers::handle_resume_campaign),
        )
        // Sender accounts and replies (EmailBison)
        .route(
            "/api/v1/workspaces/:slug/email-accounts",
            get(email_account_handlers::handle_list_email_accounts),
        )
        .route(
            "/api/v1/workspaces/:slug/replies",
            get(reply_handlers::handle_list_replies),
        )
        .route(
            "/api/v1/workspaces/:slug/replies/:id/respond",
            post(reply_handlers::handle_respond_to_reply),
        )
        // Lead lists (locally owned)
        .route(
            "/api/v1/workspaces/:slug/lead-lists",
            get(lead_list_handlers::handle_list_lead_lists)
                .post(lead_list_handlers::handle_create_lead_list),
        )
        .route(
            "/api/v1/workspaces/:slug/lead-lists/:id",
            get(lead_list_handlers::handle_get_lead_list)
                .patch(lead_list_handlers::handle_update_lead_list)
                .delete(lead_list_handlers::handle_delete_lead_list),
        )
        .route(
            "/api/v1/workspaces/:slug/lead-lists/:id/members",
            get(lead_list_handlers::handle_list_members)
                .post(lead_list_handlers::handle_add_members)
                .delete(lead_list_handlers::handle_remove_members),
        )
        .route(
            "/api/v1/workspaces/:slug/lead-lists/:id/push-to-campaign",
            post(lead_list_handlers::handle_push_to_campaign),
        )
        // People and companies (HQ)
        .route(
            "/api/v1/people/search",
            get(person_handlers::handle_search_people),
        )
        .route(
            "/api/v1/people/:id",
            get(person_handlers::handle_get_person),
        )
        .route(
            "/api/v1/companies/search",
            get(company_handlers::handle_search_companies),
        )
        .route(
            "/api/v1/companies/:id",
            get(company_handlers::handle_get_company),
        )
        // Bookings (Modal)
        .route(
            "/api/v1/bookings",
            get(booking_handlers::handle_list_bookings)
                .post(booking_handlers::handle_create_booking),
        )
        .route(
            "/api/v1/bookings/:id",
            get(booking_handlers::handle_get_booking)
                .patch(booking_handlers::handle_update_booking),
        )
        .with_state(state)
}
