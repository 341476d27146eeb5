//! Root state container.
//!
//! One [`Store`] owns the profile, cart, storefront, feed, the active try-on
//! session and the navigator. It lives behind a single `RwLock` in
//! [`AppState`](crate::state::AppState); every mutation is a method taking
//! `&mut self`, so each change is computed from the current value.
//!
//! Long-running work (generation, animation) happens outside the lock in two
//! halves: a `begin_*` call that validates and moves the navigator to a busy
//! screen, and a completion call that records the outcome.

pub mod cart;
pub mod catalog;
pub mod feed;
pub mod vendor;

use chrono::{DateTime, Utc};
use lookbook_core::{
    AccountType, Folder, FolderId, Item, ItemId, Post, PostId, PriceError, Product, Profile,
    ProfileId, ProfileUpdate,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::media::DataUrl;
use crate::navigation::{NavEvent, NavigationError, Navigator, Screen};
use crate::tryon::{TryOnSession, TryOnView};

pub use cart::{Cart, CartView};
pub use catalog::{Catalog, CatalogError};
pub use feed::Feed;
pub use vendor::{NewFolder, NewProduct, Storefront};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no profile is logged in")]
    NotLoggedIn,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("no try-on session is active")]
    NoActiveSession,

    #[error("a generation is already in progress")]
    Busy,

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// A look kept by the user.
#[derive(Debug, Clone, Serialize)]
pub struct SavedLook {
    pub image: DataUrl,
    pub items: Vec<Item>,
    pub saved_at: DateTime<Utc>,
}

/// Inputs for a render, captured when a try-on starts.
#[derive(Debug, Clone)]
pub struct PendingTryOn {
    /// Image the item is composed onto.
    pub person: DataUrl,
    pub item: Item,
    /// Items already visible on `person`.
    pub worn: Vec<Item>,
    /// Starts a new session from `person` once rendered.
    pub fresh: bool,
}

/// Inputs for an animation.
#[derive(Debug, Clone)]
pub struct PendingAnimation {
    pub image: DataUrl,
    pub items: Vec<Item>,
}

/// Application state for one user session.
#[derive(Debug)]
pub struct Store {
    profile: Option<Profile>,
    navigator: Navigator,
    catalog: Catalog,
    storefront: Storefront,
    cart: Cart,
    feed: Feed,
    session: Option<TryOnSession>,
    saved: Vec<SavedLook>,
}

impl Store {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let storefront = Storefront::new(catalog.next_id(), catalog.currency());
        Self {
            profile: None,
            navigator: Navigator::default(),
            catalog,
            storefront,
            cart: Cart::default(),
            feed: Feed::default(),
            session: None,
            saved: Vec::new(),
        }
    }

    // =========================================================================
    // Profile and navigation
    // =========================================================================

    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotLoggedIn` before login.
    pub fn require_profile(&self) -> Result<&Profile, StoreError> {
        self.profile.as_ref().ok_or(StoreError::NotLoggedIn)
    }

    #[must_use]
    pub const fn screen(&self) -> &Screen {
        self.navigator.current()
    }

    /// Log `profile` in and route to its home screen.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Navigation` if someone is already logged in.
    pub fn login(&mut self, profile: Profile) -> Result<&Profile, StoreError> {
        self.navigator.dispatch(&NavEvent::LoggedIn {
            account_type: profile.account_type,
        })?;
        info!(profile_id = %profile.id, "Logged in");
        Ok(self.profile.insert(profile))
    }

    /// Log out, dropping per-user state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Navigation` while a generation is running.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.navigator.dispatch(&NavEvent::LoggedOut)?;
        if let Some(profile) = self.profile.take() {
            info!(profile_id = %profile.id, "Logged out");
        }
        self.cart.clear();
        self.session = None;
        self.saved.clear();
        Ok(())
    }

    /// Finish account setup.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotLoggedIn` before login and
    /// `StoreError::Navigation` outside account setup.
    pub fn choose_account_type(&mut self, account_type: AccountType) -> Result<&Profile, StoreError> {
        self.require_profile()?;
        self.navigator
            .dispatch(&NavEvent::AccountTypeChosen { account_type })?;
        let profile = self.profile.as_mut().ok_or(StoreError::NotLoggedIn)?;
        profile.account_type = Some(account_type);
        Ok(profile)
    }

    /// Apply a profile patch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotLoggedIn` before login and
    /// `StoreError::Invalid` for a blank display name.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Profile, StoreError> {
        if update
            .display_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(StoreError::Invalid("display_name must not be blank".to_string()));
        }
        let profile = self.profile.as_mut().ok_or(StoreError::NotLoggedIn)?;
        profile.apply(update);
        Ok(profile)
    }

    /// Apply a client navigation event.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` for events raised by other operations,
    /// `StoreError::NotFound` for unknown items and `StoreError::Navigation`
    /// for transitions the current screen does not allow.
    pub fn navigate(&mut self, event: &NavEvent) -> Result<&Screen, StoreError> {
        if !event.is_user_initiated() {
            return Err(StoreError::Invalid(
                "event cannot be dispatched directly".to_string(),
            ));
        }
        self.require_profile()?;
        match event {
            NavEvent::OpenItem { item_id } => {
                self.find_item(*item_id)?;
            }
            NavEvent::StartTryOn { item_id } => {
                self.try_on_item(*item_id)?;
            }
            _ => {}
        }
        Ok(self.navigator.dispatch(event)?)
    }

    // =========================================================================
    // Catalog and cart
    // =========================================================================

    /// Catalog items followed by vendor products, optionally by category.
    #[must_use]
    pub fn browse(&self, category: Option<&str>) -> Vec<Item> {
        let products = self.storefront.products().iter().map(|p| &p.item);
        self.catalog
            .items()
            .iter()
            .chain(products)
            .filter(|item| category.is_none_or(|c| item.category.eq_ignore_ascii_case(c)))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    /// Look up a catalog item or vendor product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for unknown IDs.
    pub fn find_item(&self, id: ItemId) -> Result<&Item, StoreError> {
        self.catalog
            .get(id)
            .or_else(|| self.storefront.product(id).map(|p| &p.item))
            .ok_or_else(|| StoreError::NotFound {
                entity: "item",
                id: id.to_string(),
            })
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotLoggedIn` or `StoreError::NotFound`.
    pub fn add_to_cart(&mut self, id: ItemId) -> Result<CartView, StoreError> {
        self.require_profile()?;
        let item = self.find_item(id)?.clone();
        self.cart.add(item);
        Ok(self.cart.view()?)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotLoggedIn` or `StoreError::IndexOutOfRange`.
    pub fn remove_from_cart(&mut self, index: usize) -> Result<CartView, StoreError> {
        self.require_profile()?;
        self.cart.remove_at(index)?;
        Ok(self.cart.view()?)
    }

    // =========================================================================
    // Try-on
    // =========================================================================

    fn try_on_item(&self, id: ItemId) -> Result<Item, StoreError> {
        let item = self.find_item(id)?;
        if !item.try_on {
            return Err(StoreError::Invalid(format!("item {id} cannot be tried on")));
        }
        Ok(item.clone())
    }

    /// The active session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Price` if applied items mix currencies.
    pub fn session_view(&self) -> Result<Option<TryOnView>, StoreError> {
        Ok(self.session.as_ref().map(TryOnSession::view).transpose()?)
    }

    /// Start a render of `item_id` and move to `Generating`.
    ///
    /// With `photo`, a new session starts from it; this is accepted while
    /// browsing or on the photo picker. Without `photo`, the item is stacked
    /// onto the current result.
    ///
    /// # Errors
    ///
    /// - `Busy` while another generation runs
    /// - `NoActiveSession` when stacking without a session
    /// - `Invalid` for missing photos and items that cannot be tried on
    /// - `Navigation` if the current screen does not start try-ons
    pub fn begin_try_on(
        &mut self,
        item_id: ItemId,
        photo: Option<DataUrl>,
    ) -> Result<PendingTryOn, StoreError> {
        self.require_profile()?;
        if self.screen().is_busy() {
            return Err(StoreError::Busy);
        }
        let item = self.try_on_item(item_id)?;

        let Some(photo) = photo else {
            if *self.screen() != Screen::TryOnResult {
                return Err(StoreError::Invalid("photo is required".to_string()));
            }
            let session = self.session.as_ref().ok_or(StoreError::NoActiveSession)?;
            let pending = PendingTryOn {
                person: session.current_image().clone(),
                item,
                worn: session.applied_items(),
                fresh: false,
            };
            self.navigator.dispatch(&NavEvent::StartTryOn { item_id })?;
            return Ok(pending);
        };

        let waiting = match self.screen() {
            Screen::ImageSource { item_id } => Some(*item_id),
            _ => None,
        };
        let on_result = *self.screen() == Screen::TryOnResult;
        match waiting {
            Some(waiting) if waiting == item_id => {
                self.navigator.dispatch(&NavEvent::PhotoReady)?;
            }
            Some(waiting) => {
                return Err(StoreError::Invalid(format!(
                    "photo picker is open for item {waiting}, not {item_id}"
                )));
            }
            // From a result, a new photo starts over without the picker.
            None if on_result => {
                self.navigator.dispatch(&NavEvent::StartTryOn { item_id })?;
            }
            None => {
                self.navigator.dispatch(&NavEvent::StartTryOn { item_id })?;
                self.navigator.dispatch(&NavEvent::PhotoReady)?;
            }
        }

        Ok(PendingTryOn {
            person: photo,
            item,
            worn: Vec::new(),
            fresh: true,
        })
    }

    /// Record a finished render and show the result.
    ///
    /// A fresh render replaces the current session; a stacked one extends it.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` if a stacked render lost its session and
    /// `Navigation` if no generation was running.
    pub fn complete_try_on(
        &mut self,
        pending: PendingTryOn,
        image: DataUrl,
    ) -> Result<TryOnView, StoreError> {
        if !pending.fresh && self.session.is_none() {
            return Err(StoreError::NoActiveSession);
        }
        self.navigator.dispatch(&NavEvent::GenerationSucceeded)?;

        let session = if pending.fresh {
            self.session.insert(TryOnSession::new(pending.person))
        } else {
            self.session.as_mut().ok_or(StoreError::NoActiveSession)?
        };
        session.apply(pending.item, image);
        Ok(session.view()?)
    }

    /// Leave the busy screen after a failed generation or animation.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` if nothing was running.
    pub fn abort_generation(&mut self) -> Result<&Screen, StoreError> {
        Ok(self.navigator.dispatch(&NavEvent::GenerationFailed)?)
    }

    /// Remove the last applied item.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession` without a session and `Busy` while a
    /// generation runs.
    pub fn undo_try_on(&mut self) -> Result<TryOnView, StoreError> {
        if self.screen().is_busy() {
            return Err(StoreError::Busy);
        }
        let session = self.session.as_mut().ok_or(StoreError::NoActiveSession)?;
        session.undo();
        Ok(session.view()?)
    }

    fn result_session(&self) -> Result<&TryOnSession, StoreError> {
        if self.screen().is_busy() {
            return Err(StoreError::Busy);
        }
        let session = self.session.as_ref().ok_or(StoreError::NoActiveSession)?;
        if session.is_empty() {
            return Err(StoreError::Invalid("no items have been tried on".to_string()));
        }
        Ok(session)
    }

    /// Put every applied item in the cart and open it.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession`/`Invalid` without applied items.
    pub fn buy_look(&mut self) -> Result<CartView, StoreError> {
        let items = self.result_session()?.applied_items();
        self.navigator.dispatch(&NavEvent::OpenCart)?;
        self.cart.extend(items);
        Ok(self.cart.view()?)
    }

    /// Keep the current composite in the saved looks.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession`/`Invalid` without applied items.
    pub fn save_look(&mut self) -> Result<SavedLook, StoreError> {
        let session = self.result_session()?;
        let look = SavedLook {
            image: session.current_image().clone(),
            items: session.applied_items(),
            saved_at: Utc::now(),
        };
        self.saved.push(look.clone());
        Ok(look)
    }

    #[must_use]
    pub fn saved_looks(&self) -> &[SavedLook] {
        &self.saved
    }

    /// Publish the look to the feed and end the session.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn`, `NoActiveSession`/`Invalid` without applied
    /// items, or `Navigation` outside the result screen.
    pub fn publish_look(&mut self) -> Result<Post, StoreError> {
        let session = self.result_session()?;
        let image = session.current_image().to_string();
        let items = session.applied_items();
        let author = self.require_profile()?.clone();

        self.navigator.dispatch(&NavEvent::Published)?;
        self.session = None;
        let post = self.feed.publish(&author, image, items).clone();
        info!(post_id = %post.id, items = post.items.len(), "Look published");
        Ok(post)
    }

    /// Start animating the current look.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveSession`/`Invalid` without applied items or
    /// `Navigation` outside the result screen.
    pub fn begin_animation(&mut self) -> Result<PendingAnimation, StoreError> {
        let session = self.result_session()?;
        let pending = PendingAnimation {
            image: session.current_image().clone(),
            items: session.applied_items(),
        };
        self.navigator.dispatch(&NavEvent::AnimateLook)?;
        Ok(pending)
    }

    /// Return to the result screen after an animation.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` if no animation was running.
    pub fn finish_animation(&mut self) -> Result<&Screen, StoreError> {
        Ok(self.navigator.dispatch(&NavEvent::AnimationFinished)?)
    }

    // =========================================================================
    // Feed
    // =========================================================================

    #[must_use]
    pub fn feed(&self) -> &[Post] {
        self.feed.posts()
    }

    /// # Errors
    ///
    /// Returns `NotLoggedIn` or `NotFound`.
    pub fn toggle_like(&mut self, id: PostId) -> Result<Post, StoreError> {
        self.require_profile()?;
        Ok(self.feed.toggle_like(id)?.clone())
    }

    /// # Errors
    ///
    /// Returns `NotLoggedIn`, `NotFound` or `Invalid` for blank text.
    pub fn comment(&mut self, id: PostId, text: &str) -> Result<Post, StoreError> {
        let author = self.require_profile()?.display_name.clone();
        Ok(self.feed.add_comment(id, &author, text)?.clone())
    }

    // =========================================================================
    // Vendor storefront
    // =========================================================================

    /// The logged-in vendor's ID.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` or `Forbidden` for personal accounts.
    pub fn require_vendor(&self) -> Result<ProfileId, StoreError> {
        let profile = self.require_profile()?;
        if profile.account_type.is_some_and(AccountType::is_vendor) {
            Ok(profile.id)
        } else {
            Err(StoreError::Forbidden(
                "storefront management requires a business account".to_string(),
            ))
        }
    }

    /// # Errors
    ///
    /// Returns `NotLoggedIn` or `Forbidden`.
    pub fn vendor_folders(&self) -> Result<Vec<Folder>, StoreError> {
        let owner = self.require_vendor()?;
        Ok(self.storefront.folders_of(owner).cloned().collect())
    }

    /// Products in `folder`; `None` is the uncategorised bucket.
    ///
    /// # Errors
    ///
    /// Returns `NotLoggedIn` or `Forbidden`.
    pub fn vendor_products(&self, folder: Option<FolderId>) -> Result<Vec<Product>, StoreError> {
        let owner = self.require_vendor()?;
        Ok(self.storefront.products_in(owner, folder).cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `NotLoggedIn`, `Forbidden` or `Invalid`.
    pub fn create_folder(&mut self, request: NewFolder) -> Result<Folder, StoreError> {
        let owner = self.require_vendor()?;
        Ok(self.storefront.create_folder(owner, request)?.clone())
    }

    /// # Errors
    ///
    /// Returns `NotLoggedIn`, `Forbidden` or `NotFound`.
    pub fn delete_folder(&mut self, id: FolderId) -> Result<usize, StoreError> {
        let owner = self.require_vendor()?;
        self.storefront.delete_folder(owner, id)
    }

    /// # Errors
    ///
    /// Returns `NotLoggedIn`, `Forbidden`, `Invalid` or `NotFound`.
    pub fn create_product(&mut self, request: NewProduct) -> Result<Product, StoreError> {
        let owner = self.require_vendor()?;
        Ok(self.storefront.create_product(owner, request)?.clone())
    }

    /// # Errors
    ///
    /// Returns `NotLoggedIn`, `Forbidden` or `NotFound`.
    pub fn delete_product(&mut self, id: ItemId) -> Result<Product, StoreError> {
        let owner = self.require_vendor()?;
        self.storefront.delete_product(owner, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookbook_core::{CurrencyCode, Price};

    fn store() -> Store {
        Store::new(Catalog::seed().expect("seed"))
    }

    fn personal() -> Store {
        let mut store = store();
        store
            .login(Profile::new("Ana", Some(AccountType::Personal)))
            .expect("login");
        store
    }

    fn photo() -> DataUrl {
        DataUrl::new("image/png", "cGhvdG8=")
    }

    fn rendered(tag: &str) -> DataUrl {
        DataUrl::new("image/png", tag)
    }

    const DRESS: ItemId = ItemId::new(1);
    const BLAZER: ItemId = ItemId::new(2);

    /// Run a full try-on of `item_id` against a fake render.
    fn try_on(store: &mut Store, item_id: ItemId, photo: Option<DataUrl>) -> TryOnView {
        let pending = store.begin_try_on(item_id, photo).expect("begin");
        assert!(store.screen().is_busy());
        store
            .complete_try_on(pending, rendered(&format!("r{item_id}")))
            .expect("complete")
    }

    #[test]
    fn test_login_routes_by_account_type() {
        let mut store = store();
        store.login(Profile::new("Loja", Some(AccountType::Business))).expect("login");
        assert_eq!(store.screen(), &Screen::VendorDashboard);

        let mut store = self::store();
        store.login(Profile::new("Novo", None)).expect("login");
        assert_eq!(store.screen(), &Screen::AccountSetup);
        let profile = store.choose_account_type(AccountType::Personal).expect("choose");
        assert_eq!(profile.account_type, Some(AccountType::Personal));
        assert_eq!(store.screen(), &Screen::Home);
    }

    #[test]
    fn test_second_login_rejected() {
        let mut store = personal();
        assert!(matches!(
            store.login(Profile::new("Bia", None)),
            Err(StoreError::Navigation(_))
        ));
        assert_eq!(store.require_profile().expect("profile").display_name, "Ana");
    }

    #[test]
    fn test_gala_dress_then_blazer_totals() {
        let mut store = personal();
        let view = try_on(&mut store, DRESS, Some(photo()));
        assert_eq!(view.total, Price::whole(15000));
        assert_eq!(store.screen(), &Screen::TryOnResult);

        let pending = store.begin_try_on(BLAZER, None).expect("stack");
        assert_eq!(pending.person, rendered("r1"));
        assert_eq!(pending.worn.len(), 1);
        let view = store
            .complete_try_on(pending, rendered("r2"))
            .expect("complete");
        assert_eq!(view.total, Price::whole(22500));
        assert_eq!(view.image, rendered("r2"));
    }

    #[test]
    fn test_second_try_on_while_generating_is_busy() {
        let mut store = personal();
        store.begin_try_on(DRESS, Some(photo())).expect("begin");
        assert!(matches!(
            store.begin_try_on(BLAZER, Some(photo())),
            Err(StoreError::Busy)
        ));
    }

    #[test]
    fn test_failed_generation_keeps_previous_look() {
        let mut store = personal();
        try_on(&mut store, DRESS, Some(photo()));
        store.begin_try_on(BLAZER, None).expect("stack");
        store.abort_generation().expect("abort");
        assert_eq!(store.screen(), &Screen::TryOnResult);
        let view = store.session_view().expect("view").expect("session");
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn test_new_photo_from_result_keeps_look_until_rendered() {
        let mut store = personal();
        try_on(&mut store, DRESS, Some(photo()));

        store.begin_try_on(BLAZER, Some(photo())).expect("restart");
        assert_eq!(store.screen(), &Screen::Generating { item_id: BLAZER });
        store.abort_generation().expect("abort");
        assert_eq!(store.screen(), &Screen::TryOnResult);
        let view = store.session_view().expect("view").expect("session");
        assert_eq!(view.items[0].id, DRESS);

        let view = try_on(&mut store, BLAZER, Some(photo()));
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total, Price::whole(7500));
    }

    #[test]
    fn test_photo_picker_flow() {
        let mut store = personal();
        store
            .navigate(&NavEvent::StartTryOn { item_id: DRESS })
            .expect("start");
        assert!(matches!(
            store.begin_try_on(DRESS, None),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            store.begin_try_on(BLAZER, Some(photo())),
            Err(StoreError::Invalid(_))
        ));
        try_on(&mut store, DRESS, Some(photo()));
        assert_eq!(store.screen(), &Screen::TryOnResult);
    }

    #[test]
    fn test_not_try_onable_item_rejected_before_navigating() {
        let mut store = personal();
        assert!(matches!(
            store.begin_try_on(ItemId::new(14), Some(photo())),
            Err(StoreError::Invalid(_))
        ));
        assert_eq!(store.screen(), &Screen::Home);
    }

    #[test]
    fn test_undo_and_empty_undo() {
        let mut store = personal();
        try_on(&mut store, DRESS, Some(photo()));
        try_on(&mut store, BLAZER, None);
        let view = store.undo_try_on().expect("undo");
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, DRESS);
        store.undo_try_on().expect("undo");
        let view = store.undo_try_on().expect("undo on empty");
        assert!(view.items.is_empty());
        assert_eq!(view.image, photo());
    }

    #[test]
    fn test_buy_look_fills_cart() {
        let mut store = personal();
        try_on(&mut store, DRESS, Some(photo()));
        try_on(&mut store, BLAZER, None);
        let cart = store.buy_look().expect("buy");
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.total, Price::whole(22500));
        assert_eq!(store.screen(), &Screen::Cart);
    }

    #[test]
    fn test_publish_moves_to_feed_and_ends_session() {
        let mut store = personal();
        try_on(&mut store, DRESS, Some(photo()));
        let post = store.publish_look().expect("publish");
        assert_eq!(post.author_name, "Ana");
        assert_eq!(post.image, rendered("r1").to_string());
        assert_eq!(store.screen(), &Screen::Feed);
        assert!(store.session_view().expect("view").is_none());
        assert_eq!(store.feed().len(), 1);
    }

    #[test]
    fn test_publish_without_items_rejected() {
        let mut store = personal();
        assert!(matches!(store.publish_look(), Err(StoreError::NoActiveSession)));
    }

    #[test]
    fn test_animation_round_trip() {
        let mut store = personal();
        try_on(&mut store, DRESS, Some(photo()));
        let pending = store.begin_animation().expect("animate");
        assert_eq!(pending.items.len(), 1);
        assert_eq!(store.screen(), &Screen::Animating);
        assert!(matches!(store.undo_try_on(), Err(StoreError::Busy)));
        store.finish_animation().expect("finish");
        assert_eq!(store.screen(), &Screen::TryOnResult);
    }

    #[test]
    fn test_save_look() {
        let mut store = personal();
        try_on(&mut store, DRESS, Some(photo()));
        store.save_look().expect("save");
        assert_eq!(store.saved_looks().len(), 1);
        assert_eq!(store.saved_looks()[0].items[0].id, DRESS);
    }

    #[test]
    fn test_cart_by_id_and_index() {
        let mut store = personal();
        store.add_to_cart(DRESS).expect("add");
        store.add_to_cart(BLAZER).expect("add");
        let view = store.remove_from_cart(0).expect("remove");
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, BLAZER);
        assert!(matches!(
            store.add_to_cart(ItemId::new(999)),
            Err(StoreError::NotFound { entity: "item", .. })
        ));
    }

    #[test]
    fn test_vendor_products_appear_in_browse() {
        let mut store = store();
        store.login(Profile::new("Loja", Some(AccountType::Business))).expect("login");
        let product = store
            .create_product(NewProduct {
                name: "Saia Jeans".to_string(),
                price: Price::whole(180),
                image_url: "https://img.example/saia.jpg".to_string(),
                category: "bottoms".to_string(),
                folder_id: None,
                try_on: true,
            })
            .expect("product");
        assert_eq!(product.id(), ItemId::new(15));
        let bottoms = store.browse(Some("bottoms"));
        assert!(bottoms.iter().any(|item| item.id == product.id()));
        assert_eq!(store.find_item(product.id()).expect("find").name, "Saia Jeans");
    }

    #[test]
    fn test_foreign_currency_product_never_reaches_cart() {
        let mut store = store();
        store.login(Profile::new("Loja", Some(AccountType::Business))).expect("login");
        let rejected = store.create_product(NewProduct {
            name: "Import".to_string(),
            price: Price::new(Price::whole(40).amount, CurrencyCode::USD),
            image_url: "https://img.example/import.jpg".to_string(),
            category: "tops".to_string(),
            folder_id: None,
            try_on: true,
        });
        assert!(matches!(rejected, Err(StoreError::Invalid(_))));
        assert!(matches!(
            store.add_to_cart(ItemId::new(15)),
            Err(StoreError::NotFound { .. })
        ));

        let view = store.add_to_cart(DRESS).expect("add");
        assert_eq!(view.total, Price::whole(15000));
        assert_eq!(store.cart().view().expect("view").total, Price::whole(15000));
    }

    #[test]
    fn test_personal_account_cannot_manage_storefront() {
        let mut store = personal();
        assert!(matches!(
            store.create_folder(NewFolder {
                name: "X".to_string(),
                cover_image: None
            }),
            Err(StoreError::Forbidden(_))
        ));
    }

    #[test]
    fn test_logout_clears_user_state() {
        let mut store = personal();
        store.add_to_cart(DRESS).expect("add");
        try_on(&mut store, DRESS, Some(photo()));
        store.logout().expect("logout");
        assert!(store.profile().is_none());
        assert!(store.cart().is_empty());
        assert!(store.session_view().expect("view").is_none());
        assert_eq!(store.screen(), &Screen::Login);
    }

    #[test]
    fn test_generated_events_cannot_be_dispatched() {
        let mut store = personal();
        assert!(matches!(
            store.navigate(&NavEvent::GenerationSucceeded),
            Err(StoreError::Invalid(_))
        ));
        assert!(matches!(
            store.navigate(&NavEvent::OpenItem {
                item_id: ItemId::new(999)
            }),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_profile_update() {
        let mut store = personal();
        let profile = store
            .update_profile(ProfileUpdate {
                bio: Some("Moda e café".to_string()),
                ..ProfileUpdate::default()
            })
            .expect("update");
        assert_eq!(profile.bio, "Moda e café");
        assert!(matches!(
            store.update_profile(ProfileUpdate {
                display_name: Some(" ".to_string()),
                ..ProfileUpdate::default()
            }),
            Err(StoreError::Invalid(_))
        ));
    }
}
