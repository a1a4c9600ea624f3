//! Theme preference management for the document root.
//!
//! The user's choice (`light`, `dark` or `auto`) is persisted under a single
//! storage key and mirrored as exactly one `theme-*` class on the root element.
//! `auto` keeps the `theme-auto` class regardless of the system preference;
//! the stylesheet resolves it with a `prefers-color-scheme` media query. The
//! manager still resolves the appearance itself and re-applies `auto` whenever
//! the system preference changes.

mod host;
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use host::{Subscription, ThemeHost};
pub use memory::MemoryThemeHost;
#[cfg(target_arch = "wasm32")]
pub use web::WebThemeHost;

use crate::{config::ThemeConfig, errors::Error};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    str::FromStr,
};

/// A theme preference as chosen by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Auto];

    /// Every root class the manager owns.
    pub const CLASSES: [&'static str; 3] = ["theme-light", "theme-dark", "theme-auto"];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
            Theme::Auto => "theme-auto",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == value)
            .ok_or_else(|| Error::InvalidTheme(value.to_string()))
    }
}

/// The appearance a theme resolves to at a given moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

/// What to do when the preference store cannot be used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoragePolicy {
    /// Keep the preference in memory for the manager's lifetime.
    #[default]
    FallbackToMemory,
    /// Report the failure and change nothing.
    Fail,
}

struct Inner<H> {
    host: H,
    config: ThemeConfig,
    // Set only while the store rejects writes.
    memory: RefCell<Option<Theme>>,
    resolved: Cell<Option<Appearance>>,
    last_error: RefCell<Option<String>>,
    subscription: RefCell<Option<Subscription>>,
}

/// Owns the page's theme preference. Clones share the same state; the system
/// listener registered by [`ThemeManager::init`] is dropped with the last clone
/// or by [`ThemeManager::teardown`].
pub struct ThemeManager<H: ThemeHost + 'static> {
    inner: Rc<Inner<H>>,
}

impl<H: ThemeHost + 'static> Clone for ThemeManager<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: ThemeHost + 'static> ThemeManager<H> {
    pub fn new(host: H, config: ThemeConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                config,
                memory: RefCell::new(None),
                resolved: Cell::new(None),
                last_error: RefCell::new(None),
                subscription: RefCell::new(None),
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.inner.config
    }

    /// Applies the stored preference (or `auto`) and subscribes to system
    /// color-scheme changes. Calling it again re-applies and replaces the
    /// previous subscription.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] only under [`StoragePolicy::Fail`].
    pub fn init(&self) -> Result<Theme, Error> {
        let theme = match self.read_stored()? {
            None => Theme::Auto,
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(stored = %value, "ignoring unrecognised stored theme");
                Theme::Auto
            }),
        };

        self.apply(theme)?;
        self.subscribe();

        tracing::debug!(theme = %theme, "theme manager initialised");
        Ok(theme)
    }

    /// Switches to the theme called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTheme`] for an unknown name, leaving storage and
    /// root classes untouched, or [`Error::Storage`] under [`StoragePolicy::Fail`].
    pub fn set_theme(&self, name: &str) -> Result<Theme, Error> {
        let result = name
            .parse::<Theme>()
            .inspect_err(|_| tracing::error!(theme = name, "Invalid theme"))
            .and_then(|theme| self.apply(theme));
        self.inner
            .last_error
            .replace(result.as_ref().err().map(ToString::to_string));
        result
    }

    /// Message of the error returned by the most recent [`ThemeManager::set_theme`]
    /// call, `None` if it succeeded.
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.borrow().clone()
    }

    /// The persisted preference, `auto` if nothing usable is stored.
    pub fn get_theme(&self) -> Theme {
        if let Some(theme) = *self.inner.memory.borrow() {
            return theme;
        }
        match self.inner.host.read_preference(&self.inner.config.storage_key) {
            Ok(value) => value
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "theme preference unreadable, assuming auto");
                Theme::Auto
            }
        }
    }

    /// The appearance computed the last time a theme was applied.
    pub fn resolved_appearance(&self) -> Option<Appearance> {
        self.inner.resolved.get()
    }

    /// Re-applies `auto` after a system color-scheme change. Explicit `light`
    /// and `dark` choices are left alone.
    pub fn handle_system_change(&self) {
        let theme = self.get_theme();
        if theme != Theme::Auto {
            tracing::debug!(theme = %theme, "ignoring system color-scheme change");
            return;
        }
        if let Err(err) = self.apply(Theme::Auto) {
            tracing::warn!(error = %err, "failed to re-apply auto theme");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.subscription.borrow().is_some()
    }

    /// Stops listening for system color-scheme changes.
    pub fn teardown(&self) {
        let subscription = self.inner.subscription.borrow_mut().take();
        drop(subscription);
    }

    fn read_stored(&self) -> Result<Option<String>, Error> {
        if let Some(theme) = *self.inner.memory.borrow() {
            return Ok(Some(theme.as_str().to_string()));
        }
        match self.inner.host.read_preference(&self.inner.config.storage_key) {
            Ok(value) => Ok(value),
            Err(err) => match self.inner.config.storage_policy {
                StoragePolicy::Fail => Err(err),
                StoragePolicy::FallbackToMemory => {
                    tracing::warn!(error = %err, "theme preference unreadable, using default");
                    Ok(None)
                }
            },
        }
    }

    fn persist(&self, theme: Theme) -> Result<(), Error> {
        let key = &self.inner.config.storage_key;
        match self.inner.host.write_preference(key, theme.as_str()) {
            Ok(()) => {
                self.inner.memory.replace(None);
                Ok(())
            }
            Err(err) => match self.inner.config.storage_policy {
                StoragePolicy::Fail => {
                    tracing::error!(error = %err, theme = %theme, "theme preference not stored");
                    Err(err)
                }
                StoragePolicy::FallbackToMemory => {
                    tracing::warn!(error = %err, "theme preference kept in memory only");
                    self.inner.memory.replace(Some(theme));
                    Ok(())
                }
            },
        }
    }

    fn apply(&self, theme: Theme) -> Result<Theme, Error> {
        self.persist(theme)?;

        let host = &self.inner.host;
        host.remove_root_classes(&Theme::CLASSES);
        host.add_root_class(theme.class_name());

        let appearance = self.resolve(theme);
        self.inner.resolved.set(Some(appearance));
        tracing::debug!(theme = %theme, ?appearance, "applied theme");

        Ok(theme)
    }

    fn resolve(&self, theme: Theme) -> Appearance {
        match theme {
            Theme::Light => Appearance::Light,
            Theme::Dark => Appearance::Dark,
            Theme::Auto if self.inner.host.prefers_dark() => Appearance::Dark,
            Theme::Auto => Appearance::Light,
        }
    }

    fn subscribe(&self) {
        let weak = Rc::downgrade(&self.inner);
        let on_change = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                ThemeManager { inner }.handle_system_change();
            }
        });

        match self.inner.host.watch_color_scheme(on_change) {
            Ok(subscription) => {
                let previous = self.inner.subscription.replace(Some(subscription));
                drop(previous);
            }
            Err(err) => {
                tracing::warn!(error = %err, "system color-scheme changes will be ignored");
            }
        }
    }
}
