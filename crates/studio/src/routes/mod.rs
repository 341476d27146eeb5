//! HTTP route handlers for the studio API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Health check
//! GET    /api/capabilities           - Live/demo engines and backend status
//!
//! # Session and profile
//! GET    /api/session                - Current profile and screen
//! POST   /api/session                - Mock login {display_name, account_type?} or {profile_id}
//! DELETE /api/session                - Logout
//! PATCH  /api/profile                - Profile patch
//! POST   /api/profile/account-type   - Finish account setup {account_type}
//!
//! # Navigation
//! GET    /api/screen                 - Current screen
//! POST   /api/screen                 - Dispatch a navigation event
//!
//! # Catalog and cart
//! GET    /api/catalog?category=      - Catalog items and vendor products
//! GET    /api/categories             - Catalog categories
//! GET    /api/items/{id}             - Item detail
//! GET    /api/cart                   - Cart with total
//! POST   /api/cart                   - Add item {item_id}
//! DELETE /api/cart/{index}           - Remove by position
//!
//! # Try-on
//! GET    /api/try-on                 - Active result session
//! POST   /api/try-on                 - Render {item_id, photo?}
//! POST   /api/try-on/undo            - Remove last applied item
//! POST   /api/try-on/buy             - Add applied items to cart
//! POST   /api/try-on/save            - Keep the current look
//! POST   /api/try-on/publish         - Publish the look to the feed
//! POST   /api/try-on/animate         - Short video of the look
//! GET    /api/looks                  - Saved looks
//!
//! # Feed
//! GET    /api/feed                   - Posts, newest first
//! POST   /api/feed/{id}/like         - Toggle like
//! POST   /api/feed/{id}/comments     - Append comment {text}
//!
//! # Vendor storefront (business accounts)
//! GET    /api/folders                - Own folders
//! POST   /api/folders                - Create folder
//! DELETE /api/folders/{id}           - Delete folder, products become uncategorised
//! GET    /api/products?folder_id=    - Own products in a folder (none: uncategorised)
//! POST   /api/products               - Create product
//! DELETE /api/products/{id}          - Delete product
//! ```

pub mod cart;
pub mod catalog;
pub mod feed;
pub mod screen;
pub mod session;
pub mod try_on;
pub mod vendor;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the session and profile routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            get(session::show)
                .post(session::login)
                .delete(session::logout),
        )
        .route("/profile", axum::routing::patch(session::update_profile))
        .route("/profile/account-type", post(session::choose_account_type))
        .route("/capabilities", get(session::capabilities))
        .route("/screen", get(screen::show).post(screen::dispatch))
}

/// Create the catalog and cart routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::index))
        .route("/categories", get(catalog::categories))
        .route("/items/{id}", get(catalog::show))
        .route("/cart", get(cart::show).post(cart::add))
        .route("/cart/{index}", delete(cart::remove))
}

/// Create the try-on routes router.
pub fn try_on_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(try_on::show).post(try_on::create))
        .route("/undo", post(try_on::undo))
        .route("/buy", post(try_on::buy))
        .route("/save", post(try_on::save))
        .route("/publish", post(try_on::publish))
        .route("/animate", post(try_on::animate))
}

/// Create the feed routes router.
pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(feed::index))
        .route("/{id}/like", post(feed::like))
        .route("/{id}/comments", post(feed::comment))
}

/// Create the vendor storefront routes router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", get(vendor::folders).post(vendor::create_folder))
        .route("/folders/{id}", delete(vendor::delete_folder))
        .route(
            "/products",
            get(vendor::products).post(vendor::create_product),
        )
        .route("/products/{id}", delete(vendor::delete_product))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(session_routes())
        .merge(shop_routes())
        .merge(vendor_routes())
        .route("/looks", get(try_on::looks))
        .nest("/try-on", try_on_routes())
        .nest("/feed", feed_routes());

    Router::new().nest("/api", api)
}
