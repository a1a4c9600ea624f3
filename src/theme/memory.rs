use super::host::{Subscription, ThemeHost};
use crate::errors::Error;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct State {
    classes: RefCell<Vec<String>>,
    storage: RefCell<HashMap<String, String>>,
    storage_unavailable: Cell<bool>,
    prefers_dark: Cell<bool>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
    appearance_queries: Cell<usize>,
}

/// In-memory [`ThemeHost`] for tests and native hosts. Clones share state, so
/// a test can keep a handle while a manager owns another.
#[derive(Clone, Default)]
pub struct MemoryThemeHost {
    state: Rc<State>,
}

impl MemoryThemeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with `value` under `key`.
    #[must_use]
    pub fn with_stored(self, key: &str, value: &str) -> Self {
        self.state
            .storage
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Seeds the root with an unrelated class, e.g. `js`.
    #[must_use]
    pub fn with_root_class(self, class: &str) -> Self {
        self.add_root_class(class);
        self
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.state.storage.borrow().get(key).cloned()
    }

    /// Makes every storage call fail until re-enabled.
    pub fn set_storage_available(&self, available: bool) {
        self.state.storage_unavailable.set(!available);
    }

    /// Changes the system preference without notifying listeners.
    pub fn set_prefers_dark(&self, dark: bool) {
        self.state.prefers_dark.set(dark);
    }

    /// Changes the system preference and notifies every listener.
    pub fn emit_color_scheme_change(&self, dark: bool) {
        self.set_prefers_dark(dark);
        let listeners: Vec<Listener> = self
            .state
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }

    /// How many times the system preference has been queried.
    pub fn appearance_queries(&self) -> usize {
        self.state.appearance_queries.get()
    }

    fn check_storage(&self) -> Result<(), Error> {
        if self.state.storage_unavailable.get() {
            Err(Error::Storage("storage is unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ThemeHost for MemoryThemeHost {
    fn root_classes(&self) -> Vec<String> {
        self.state.classes.borrow().clone()
    }

    fn add_root_class(&self, class: &str) {
        let mut classes = self.state.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_root_classes(&self, classes: &[&str]) {
        self.state
            .classes
            .borrow_mut()
            .retain(|c| !classes.contains(&c.as_str()));
    }

    fn read_preference(&self, key: &str) -> Result<Option<String>, Error> {
        self.check_storage()?;
        Ok(self.stored(key))
    }

    fn write_preference(&self, key: &str, value: &str) -> Result<(), Error> {
        self.check_storage()?;
        self.state
            .storage
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn prefers_dark(&self) -> bool {
        let queries = &self.state.appearance_queries;
        queries.set(queries.get() + 1);
        self.state.prefers_dark.get()
    }

    fn watch_color_scheme(&self, on_change: Box<dyn Fn()>) -> Result<Subscription, Error> {
        let id = self.state.next_listener.get();
        self.state.next_listener.set(id + 1);
        self.state
            .listeners
            .borrow_mut()
            .push((id, Rc::from(on_change)));

        let state = Rc::downgrade(&self.state);
        Ok(Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.listeners.borrow_mut().retain(|(other, _)| *other != id);
            }
        }))
    }
}
