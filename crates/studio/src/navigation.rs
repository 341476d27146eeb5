//! Screen state machine.
//!
//! Every screen carries the context it needs (a category, an item) and every
//! move between screens goes through [`Navigator::dispatch`], which consults
//! one transition table. Account-type routing lives only in [`home_for`].

use lookbook_core::{AccountType, ItemId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// History depth kept for `Back`.
pub const MAX_HISTORY: usize = 32;

/// What the user is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Login,
    AccountSetup,
    Home,
    VendorDashboard,
    Category { category: String },
    ItemDetail { item_id: ItemId },
    /// Waiting for a photo to try `item_id` on.
    ImageSource { item_id: ItemId },
    /// A composition for `item_id` is in flight.
    Generating { item_id: ItemId },
    TryOnResult,
    Animating,
    Cart,
    Feed,
    Profile,
    Settings,
}

impl Screen {
    /// Screens that only exist while a try-on is being set up or run.
    /// They are dropped from history once the result is shown.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ImageSource { .. } | Self::Generating { .. })
    }

    /// Screens that require a logged-in profile.
    #[must_use]
    pub const fn requires_profile(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Whether a long-running request owns the screen.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Generating { .. } | Self::Animating)
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::AccountSetup => "account_setup",
            Self::Home => "home",
            Self::VendorDashboard => "vendor_dashboard",
            Self::Category { .. } => "category",
            Self::ItemDetail { .. } => "item_detail",
            Self::ImageSource { .. } => "image_source",
            Self::Generating { .. } => "generating",
            Self::TryOnResult => "try_on_result",
            Self::Animating => "animating",
            Self::Cart => "cart",
            Self::Feed => "feed",
            Self::Profile => "profile",
            Self::Settings => "settings",
        }
    }

    /// Screens reachable from the main tab bar.
    const fn is_browsing(&self) -> bool {
        matches!(
            self,
            Self::Home
                | Self::VendorDashboard
                | Self::Category { .. }
                | Self::ItemDetail { .. }
                | Self::TryOnResult
                | Self::Cart
                | Self::Feed
                | Self::Profile
                | Self::Settings
        )
    }
}

/// Something the user did, or something that finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavEvent {
    LoggedIn { account_type: Option<AccountType> },
    AccountTypeChosen { account_type: AccountType },
    OpenCategory { category: String },
    OpenItem { item_id: ItemId },
    StartTryOn { item_id: ItemId },
    PhotoReady,
    GenerationSucceeded,
    GenerationFailed,
    AnimateLook,
    AnimationFinished,
    OpenCart,
    OpenFeed,
    OpenProfile,
    OpenSettings,
    Published,
    Back,
    LoggedOut,
}

impl NavEvent {
    /// Events a client may send directly. The rest are raised by the
    /// operations they describe (login, generation, publishing).
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::OpenCategory { .. }
                | Self::OpenItem { .. }
                | Self::StartTryOn { .. }
                | Self::OpenCart
                | Self::OpenFeed
                | Self::OpenProfile
                | Self::OpenSettings
                | Self::Back
        )
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::LoggedIn { .. } => "logged_in",
            Self::AccountTypeChosen { .. } => "account_type_chosen",
            Self::OpenCategory { .. } => "open_category",
            Self::OpenItem { .. } => "open_item",
            Self::StartTryOn { .. } => "start_try_on",
            Self::PhotoReady => "photo_ready",
            Self::GenerationSucceeded => "generation_succeeded",
            Self::GenerationFailed => "generation_failed",
            Self::AnimateLook => "animate_look",
            Self::AnimationFinished => "animation_finished",
            Self::OpenCart => "open_cart",
            Self::OpenFeed => "open_feed",
            Self::OpenProfile => "open_profile",
            Self::OpenSettings => "open_settings",
            Self::Published => "published",
            Self::Back => "back",
            Self::LoggedOut => "logged_out",
        }
    }
}

/// Rejected navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("cannot handle '{event}' on screen '{from}'")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },
}

/// Where an account lands after login or setup.
#[must_use]
pub const fn home_for(account_type: Option<AccountType>) -> Screen {
    match account_type {
        Some(AccountType::Business) => Screen::VendorDashboard,
        Some(AccountType::Personal) => Screen::Home,
        None => Screen::AccountSetup,
    }
}

/// How a transition changes the history stack.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Transition {
    /// Remember the current screen, then show the new one.
    Push(Screen),
    /// Show the new screen without remembering the current one.
    Replace(Screen),
    /// Like `Replace`, also dropping transient screens from history.
    Settle(Screen),
    /// Forget all history.
    Reset(Screen),
    /// Return to the previous screen.
    Pop,
}

/// The transition table.
fn transition(current: &Screen, event: &NavEvent) -> Option<Transition> {
    use NavEvent as E;
    use Screen as S;

    let next = match (current, event) {
        (S::Login, E::LoggedIn { account_type }) => Transition::Reset(home_for(*account_type)),
        (S::AccountSetup, E::AccountTypeChosen { account_type }) => {
            Transition::Reset(home_for(Some(*account_type)))
        }

        (from, E::OpenCategory { category }) if from.is_browsing() => {
            Transition::Push(S::Category {
                category: category.clone(),
            })
        }
        (from, E::OpenItem { item_id }) if from.is_browsing() => {
            Transition::Push(S::ItemDetail { item_id: *item_id })
        }

        // A fresh try-on asks for a photo; stacking onto a result reuses it.
        (S::ItemDetail { .. } | S::Category { .. } | S::Home, E::StartTryOn { item_id }) => {
            Transition::Push(S::ImageSource { item_id: *item_id })
        }
        (S::TryOnResult, E::StartTryOn { item_id }) => {
            Transition::Push(S::Generating { item_id: *item_id })
        }
        (S::ImageSource { item_id }, E::PhotoReady) => {
            Transition::Push(S::Generating { item_id: *item_id })
        }
        (S::Generating { .. }, E::GenerationSucceeded) => Transition::Settle(S::TryOnResult),
        (S::Generating { .. } | S::Animating, E::GenerationFailed) | (S::Animating, E::AnimationFinished) => {
            Transition::Pop
        }

        (S::TryOnResult, E::AnimateLook) => Transition::Push(S::Animating),
        (S::TryOnResult, E::Published) => Transition::Replace(S::Feed),

        (from, E::OpenCart) if from.is_browsing() => Transition::Push(S::Cart),
        (from, E::OpenFeed) if from.is_browsing() => Transition::Push(S::Feed),
        (from, E::OpenProfile) if from.is_browsing() => Transition::Push(S::Profile),
        (from, E::OpenSettings) if from.is_browsing() => Transition::Push(S::Settings),

        (from, E::Back) if !from.is_busy() => Transition::Pop,
        (from, E::LoggedOut) if from.requires_profile() && !from.is_busy() => {
            Transition::Reset(S::Login)
        }

        _ => return None,
    };
    Some(next)
}

/// Current screen plus bounded back-stack.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Screen,
    history: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Screen::Login,
            history: Vec::new(),
        }
    }
}

impl Navigator {
    #[must_use]
    pub const fn current(&self) -> &Screen {
        &self.current
    }

    /// Number of screens `Back` can return through.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Apply an event.
    ///
    /// `Back` with no history stays on the current screen.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` if the current screen does
    /// not accept `event`; the navigator is left unchanged.
    pub fn dispatch(&mut self, event: &NavEvent) -> Result<&Screen, NavigationError> {
        let step = transition(&self.current, event).ok_or(NavigationError::InvalidTransition {
            from: self.current.name(),
            event: event.name(),
        })?;

        match step {
            Transition::Push(next) => {
                let previous = std::mem::replace(&mut self.current, next);
                self.history.push(previous);
                if self.history.len() > MAX_HISTORY {
                    self.history.remove(0);
                }
            }
            Transition::Replace(next) => self.current = next,
            Transition::Settle(next) => {
                while self
                    .history
                    .last()
                    .is_some_and(|s| s.is_transient() || *s == next)
                {
                    self.history.pop();
                }
                self.current = next;
            }
            Transition::Reset(next) => {
                self.history.clear();
                self.current = next;
            }
            Transition::Pop => {
                if let Some(previous) = self.history.pop() {
                    self.current = previous;
                }
            }
        }

        debug!(event = event.name(), screen = self.current.name(), "Navigated");
        Ok(&self.current)
    }
}
