//! JavaScript surface for the static site. Page glue creates one
//! `ThemeSwitcher` on `DOMContentLoaded`, calls `init()` and renders its card
//! lists with `renderPolicyCards` / `renderFeatureCards`.

use crate::{
    components::{records_from_value, CardFactory, FeatureRecord, PolicyRecord, RenderOutcome},
    config::AppConfig,
    dom::{Document, WebDocument},
    logging,
    theme::{ThemeManager, WebThemeHost},
};
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    // A host page may have installed its own subscriber already.
    let _ = logging::init(tracing::Level::WARN);
}

#[wasm_bindgen]
pub struct ThemeSwitcher {
    manager: ThemeManager<WebThemeHost>,
}

#[wasm_bindgen]
impl ThemeSwitcher {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ThemeSwitcher, JsValue> {
        let host = WebThemeHost::current()
            .ok_or_else(|| JsValue::from_str("ThemeSwitcher requires a browser document"))?;
        Ok(Self {
            manager: ThemeManager::new(host, AppConfig::load().theme()),
        })
    }

    pub fn init(&self) -> Result<String, JsValue> {
        self.manager
            .init()
            .map(|theme| theme.as_str().to_string())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Returns the applied theme, or `undefined` if it was rejected; the reason
    /// is then available from `lastError`.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, name: &str) -> Option<String> {
        self.manager
            .set_theme(name)
            .ok()
            .map(|theme| theme.as_str().to_string())
    }

    /// Why the last `setTheme` call failed, `undefined` after a success.
    #[wasm_bindgen(getter = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.manager.last_error()
    }

    #[wasm_bindgen(js_name = getTheme)]
    pub fn get_theme(&self) -> String {
        self.manager.get_theme().as_str().to_string()
    }

    pub fn teardown(&self) {
        self.manager.teardown();
    }
}

/// Renders policy cards; returns the card count, or `undefined` when the
/// container does not exist. Fields of the wrong type render as blank text.
#[wasm_bindgen(js_name = renderPolicyCards)]
pub fn render_policy_cards(container_id: &str, records: JsValue) -> Result<Option<u32>, JsValue> {
    let document = current_document()?;
    if !document.has_container(container_id) {
        return Ok(None);
    }
    let records: Vec<PolicyRecord> = records_from_value(&to_json(&records));
    let outcome = factory()
        .render_policy_cards(&document, container_id, &records)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(rendered_count(outcome))
}

/// Feature-card counterpart of `renderPolicyCards`.
#[wasm_bindgen(js_name = renderFeatureCards)]
pub fn render_feature_cards(container_id: &str, records: JsValue) -> Result<Option<u32>, JsValue> {
    let document = current_document()?;
    if !document.has_container(container_id) {
        return Ok(None);
    }
    let records: Vec<FeatureRecord> = records_from_value(&to_json(&records));
    let outcome = factory()
        .render_feature_cards(&document, container_id, &records)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(rendered_count(outcome))
}

fn factory() -> CardFactory {
    CardFactory::new(AppConfig::load().strictness)
}

fn current_document() -> Result<WebDocument, JsValue> {
    WebDocument::current().ok_or_else(|| JsValue::from_str("no browser document"))
}

// Values JSON.stringify cannot represent become `null`, i.e. no records.
fn to_json(records: &JsValue) -> Value {
    js_sys::JSON::stringify(records)
        .ok()
        .and_then(|json| json.as_string())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or(Value::Null)
}

fn rendered_count(outcome: RenderOutcome) -> Option<u32> {
    match outcome {
        RenderOutcome::Rendered { count } => Some(u32::try_from(count).unwrap_or(u32::MAX)),
        RenderOutcome::MissingContainer => None,
    }
}
