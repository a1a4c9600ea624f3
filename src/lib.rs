//! # Restful Sounds UI
//!
//! Browser-side helpers for the Restful Sounds marketing site.
//!
//! ## Card rendering
//!
//! [`components`] turns policy and feature records into detached
//! [`dom::Element`] trees and mounts them into a container by id, replacing
//! whatever the container held. Text is always inserted as text content. A
//! missing container is skipped silently and reported as
//! [`components::RenderOutcome::MissingContainer`].
//!
//! ## Theme preference
//!
//! [`theme::ThemeManager`] keeps the user's `light`, `dark` or `auto` choice in
//! `localStorage`, mirrors it as a single `theme-*` class on the document root
//! and re-applies `auto` when the system color scheme changes.
//!
//! Both pieces talk to the page through small traits ([`dom::Document`] and
//! [`theme::ThemeHost`]) with browser implementations on `wasm32` and in-memory
//! ones everywhere, so the behavior is testable without a browser.

#[cfg(target_arch = "wasm32")]
pub mod bindings;
pub mod components;
pub mod config;
pub mod dom;
pub mod errors;
pub mod logging;
pub mod theme;

pub use components::{
    create_feature_card, create_policy_card, render_feature_cards, render_policy_cards,
    CardFactory, FeatureRecord, PolicyRecord, RenderOutcome, Strictness,
};
pub use config::{AppConfig, ThemeConfig};
pub use errors::Error;
pub use theme::{Appearance, StoragePolicy, Theme, ThemeHost, ThemeManager};
