//! Detached element trees and the document seam they are mounted through.
//!
//! Cards are built as plain [`Element`] values so they can be produced and
//! inspected without a browser. A [`Document`] implementation turns them into
//! real nodes. Text is always literal text content and is never parsed as
//! markup.

mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::MemoryDocument;
#[cfg(target_arch = "wasm32")]
pub use web::WebDocument;

use crate::errors::Error;
use std::fmt::Write;

/// A host-independent element tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Adds every whitespace-separated class in `class`.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes
            .extend(class.split_whitespace().map(str::to_string));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The class attribute as the DOM would report it.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Text set directly on this element, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Concatenated text of this element and its descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Serializes the tree with all text escaped.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.class_name()));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A page that exposes containers addressable by id.
pub trait Document {
    fn has_container(&self, container_id: &str) -> bool;

    /// Discards every child of the container `container_id` and appends
    /// `children` in order. Returns `Ok(false)`, without mutating anything,
    /// when no such container exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dom`] if the host could not build or insert the nodes.
    /// The container is never left partially filled.
    fn replace_children(&self, container_id: &str, children: &[Element]) -> Result<bool, Error>;
}
