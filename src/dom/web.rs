use super::{Document, Element};
use crate::errors::Error;
use wasm_bindgen::JsValue;

/// [`Document`] backed by the browser DOM.
#[derive(Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The document of the current window, if running in a browser page.
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    fn build(&self, element: &Element) -> Result<web_sys::Element, JsValue> {
        let node = self.document.create_element(element.tag())?;
        if !element.classes().is_empty() {
            node.set_class_name(&element.class_name());
        }
        // set_text_content never parses markup.
        if let Some(text) = element.text() {
            node.set_text_content(Some(text));
        }
        for child in element.children() {
            node.append_child(&self.build(child)?)?;
        }
        Ok(node)
    }
}

impl Document for WebDocument {
    fn has_container(&self, container_id: &str) -> bool {
        self.document.get_element_by_id(container_id).is_some()
    }

    fn replace_children(&self, container_id: &str, children: &[Element]) -> Result<bool, Error> {
        let Some(container) = self.document.get_element_by_id(container_id) else {
            return Ok(false);
        };

        // Build off-page so a failure never leaves a partial list behind.
        let fragment = self.document.create_document_fragment();
        for child in children {
            self.build(child)
                .and_then(|node| fragment.append_child(&node))
                .map_err(|err| dom_error(container_id, &err))?;
        }

        container.set_text_content(None);
        container
            .append_child(&fragment)
            .map_err(|err| dom_error(container_id, &err))?;
        Ok(true)
    }
}

fn dom_error(container_id: &str, err: &JsValue) -> Error {
    let message = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    tracing::error!(container = container_id, error = %message, "failed to render cards");
    Error::Dom(format!("#{container_id}: {message}"))
}
