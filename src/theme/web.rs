use super::host::{Subscription, ThemeHost};
use crate::errors::Error;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{MediaQueryList, Storage, Window};

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// [`ThemeHost`] backed by `document.documentElement`, `localStorage` and
/// `matchMedia`.
#[derive(Clone)]
pub struct WebThemeHost {
    window: Window,
    root: web_sys::Element,
}

impl WebThemeHost {
    pub fn new(window: Window, root: web_sys::Element) -> Self {
        Self { window, root }
    }

    /// Host for the current page, if running in a browser with a document.
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let root = window.document()?.document_element()?;
        Some(Self::new(window, root))
    }

    fn storage(&self) -> Result<Storage, Error> {
        self.window
            .local_storage()
            .map_err(|err| Error::Storage(js_message(&err)))?
            .ok_or_else(|| Error::Storage("localStorage is not available".to_string()))
    }

    fn media_query(&self) -> Option<MediaQueryList> {
        self.window.match_media(DARK_SCHEME_QUERY).ok().flatten()
    }
}

impl ThemeHost for WebThemeHost {
    fn root_classes(&self) -> Vec<String> {
        let list = self.root.class_list();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn add_root_class(&self, class: &str) {
        if let Err(err) = self.root.class_list().add_1(class) {
            tracing::error!(class, error = %js_message(&err), "failed to add root class");
        }
    }

    fn remove_root_classes(&self, classes: &[&str]) {
        let list = self.root.class_list();
        for class in classes {
            if let Err(err) = list.remove_1(class) {
                tracing::error!(class, error = %js_message(&err), "failed to remove root class");
            }
        }
    }

    fn read_preference(&self, key: &str) -> Result<Option<String>, Error> {
        self.storage()?
            .get_item(key)
            .map_err(|err| Error::Storage(js_message(&err)))
    }

    fn write_preference(&self, key: &str, value: &str) -> Result<(), Error> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| Error::Storage(js_message(&err)))
    }

    fn prefers_dark(&self) -> bool {
        self.media_query().is_some_and(|query| query.matches())
    }

    fn watch_color_scheme(&self, on_change: Box<dyn Fn()>) -> Result<Subscription, Error> {
        let query = self
            .media_query()
            .ok_or_else(|| Error::Subscription("matchMedia is not available".to_string()))?;
        let closure = Closure::<dyn Fn()>::wrap(on_change);

        query
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .map_err(|err| Error::Subscription(js_message(&err)))?;

        Ok(Subscription::fallible(move || {
            let removed = query
                .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
                .map_err(|err| Error::Subscription(js_message(&err)));
            drop(closure);
            removed
        }))
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
