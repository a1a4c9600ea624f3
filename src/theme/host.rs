use crate::errors::Error;

/// The environment a [`super::ThemeManager`] runs in: the document root's
/// class list, a key/value preference store and the system color-scheme signal.
pub trait ThemeHost {
    /// Classes currently on the document root.
    fn root_classes(&self) -> Vec<String>;

    fn add_root_class(&self, class: &str);

    fn remove_root_classes(&self, classes: &[&str]);

    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store cannot be reached.
    fn read_preference(&self, key: &str) -> Result<Option<String>, Error>;

    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the value could not be written.
    fn write_preference(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Whether the host currently prefers a dark color scheme.
    fn prefers_dark(&self) -> bool;

    /// Registers `on_change` for color-scheme change notifications. The
    /// listener stays registered until the returned [`Subscription`] is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subscription`] if the host cannot deliver notifications.
    fn watch_color_scheme(&self, on_change: Box<dyn Fn()>) -> Result<Subscription, Error>;
}

/// Unregisters a listener when dropped.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Like [`Subscription::new`] for hosts whose unregistration can fail; a
    /// failure is logged at `warn`.
    pub fn fallible(cancel: impl FnOnce() -> Result<(), Error> + 'static) -> Self {
        Self::new(move || {
            if let Err(err) = cancel() {
                tracing::warn!(error = %err, "failed to unregister listener");
            }
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Subscription;
    use crate::errors::Error;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn dropping_a_subscription_cancels_once() {
        let cancelled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&cancelled);

        let subscription = Subscription::new(move || counter.set(counter.get() + 1));
        assert_eq!(cancelled.get(), 0);
        drop(subscription);

        assert_eq!(cancelled.get(), 1);
    }

    #[test]
    fn failed_unregistration_is_absorbed() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);

        let subscription = Subscription::fallible(move || {
            counter.set(counter.get() + 1);
            Err(Error::Subscription("listener already gone".to_string()))
        });
        drop(subscription);

        assert_eq!(attempts.get(), 1);
    }
}
