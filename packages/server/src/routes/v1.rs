use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/recyclable-item-categories", category_routes())
        .nest("/recyclable-items", item_routes())
        .nest("/recycling-bins", bin_routes())
        .nest("/recycling-sessions", session_routes())
        .nest("/admin/profiles", profile_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::category::list_categories,
            handlers::category::create_category
        ))
        .routes(routes!(
            handlers::category::get_category,
            handlers::category::update_category,
            handlers::category::delete_category
        ))
}

fn item_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::item::list_items,
            handlers::item::create_item
        ))
        .routes(routes!(
            handlers::item::get_item,
            handlers::item::update_item,
            handlers::item::delete_item
        ))
}

fn bin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::bin::list_bins, handlers::bin::create_bin))
        .routes(routes!(
            handlers::bin::get_bin,
            handlers::bin::update_bin,
            handlers::bin::delete_bin
        ))
}

fn session_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::session::list_sessions))
        .routes(routes!(
            handlers::session::get_session,
            handlers::session::override_session
        ))
}

fn profile_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::profile::list_profiles))
        .routes(routes!(
            handlers::profile::get_profile,
            handlers::profile::update_profile
        ))
}
