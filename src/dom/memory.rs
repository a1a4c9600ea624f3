use super::{Document, Element};
use crate::errors::Error;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

/// In-memory [`Document`] for tests and native hosts. Containers exist only
/// once registered with [`MemoryDocument::add_container`].
#[derive(Debug, Default)]
pub struct MemoryDocument {
    containers: RefCell<HashMap<String, Vec<Element>>>,
    mutations: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty container.
    pub fn add_container(&self, id: impl Into<String>) {
        self.containers.borrow_mut().entry(id.into()).or_default();
    }

    /// Registers a container that already holds `children`.
    pub fn add_container_with(&self, id: impl Into<String>, children: Vec<Element>) {
        self.containers.borrow_mut().insert(id.into(), children);
    }

    /// Current children of `id`, or `None` if there is no such container.
    pub fn children(&self, id: &str) -> Option<Vec<Element>> {
        self.containers.borrow().get(id).cloned()
    }

    /// Number of successful `replace_children` calls so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    /// Makes node insertion fail, as a browser would on a detached document.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl Document for MemoryDocument {
    fn has_container(&self, container_id: &str) -> bool {
        self.containers.borrow().contains_key(container_id)
    }

    fn replace_children(&self, container_id: &str, children: &[Element]) -> Result<bool, Error> {
        let mut containers = self.containers.borrow_mut();
        let Some(container) = containers.get_mut(container_id) else {
            return Ok(false);
        };
        container.clear();
        if self.failing.get() {
            return Err(Error::Dom(format!("cannot insert into #{container_id}")));
        }
        container.extend_from_slice(children);
        self.mutations.set(self.mutations.get() + 1);
        Ok(true)
    }
}
