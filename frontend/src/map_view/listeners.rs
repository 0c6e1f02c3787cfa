//! Listener and periodic-task bookkeeping for one map view activation.
//!
//! Every DOM listener and the position-update task the view creates is owned
//! here as an RAII guard. Dropping a guard detaches the listener or cancels the
//! timer, so [`ListenerRegistry::clear_all`] is the single teardown path.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    Document,
    /// Control inside the view, named by its role (`"species"`, `"length_from"`, ...).
    Element(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("a periodic task is already registered for this view")]
    PeriodicTaskActive,
}

pub struct RegisteredListener<L> {
    pub event_type: &'static str,
    pub target: ListenerTarget,
    _guard: L,
}

/// `L` is the listener guard type, `T` the periodic task guard type.
pub struct ListenerRegistry<L, T> {
    listeners: Vec<RegisteredListener<L>>,
    periodic_task: Option<T>,
}

impl<L, T> Default for ListenerRegistry<L, T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            periodic_task: None,
        }
    }
}

impl<L, T> ListenerRegistry<L, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the document-level click delegate.
    pub fn register_click_delegate(&mut self, guard: L) {
        self.register_listener("click", ListenerTarget::Document, guard);
    }

    pub fn register_listener(&mut self, event_type: &'static str, target: ListenerTarget, guard: L) {
        self.listeners.push(RegisteredListener {
            event_type,
            target,
            _guard: guard,
        });
    }

    /// At most one periodic task per activation. A rejected task is dropped
    /// right away, which cancels it.
    pub fn register_periodic_task(&mut self, task: T) -> Result<(), RegistryError> {
        if self.periodic_task.is_some() {
            drop(task);
            return Err(RegistryError::PeriodicTaskActive);
        }
        self.periodic_task = Some(task);
        Ok(())
    }

    /// Cancels the periodic task, then detaches every listener. Safe to call
    /// any number of times.
    pub fn clear_all(&mut self) {
        self.periodic_task = None;
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_periodic_task(&self) -> bool {
        self.periodic_task.is_some()
    }

    #[cfg(test)]
    pub fn listeners(&self) -> impl Iterator<Item = (&'static str, ListenerTarget)> + '_ {
        self.listeners
            .iter()
            .map(|listener| (listener.event_type, listener.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_view::testing::{GuardCounter, TestGuard};

    fn registry() -> ListenerRegistry<TestGuard, TestGuard> {
        ListenerRegistry::new()
    }

    #[test]
    fn test_clear_all_drops_every_guard() {
        let listeners = GuardCounter::default();
        let tasks = GuardCounter::default();
        let mut registry = registry();

        registry.register_click_delegate(listeners.guard());
        registry.register_listener("input", ListenerTarget::Element("species"), listeners.guard());
        registry.register_periodic_task(tasks.guard()).unwrap();
        assert_eq!(listeners.live(), 2);
        assert_eq!(tasks.live(), 1);

        registry.clear_all();
        assert_eq!(registry.listener_count(), 0);
        assert!(!registry.has_periodic_task());
        assert_eq!(listeners.live(), 0);
        assert_eq!(tasks.live(), 0);

        // second clear is a no-op
        registry.clear_all();
        assert_eq!(listeners.live(), 0);
        assert_eq!(tasks.live(), 0);
    }

    #[test]
    fn test_second_periodic_task_is_rejected_and_released() {
        let tasks = GuardCounter::default();
        let mut registry = registry();

        registry.register_periodic_task(tasks.guard()).unwrap();
        assert_eq!(
            registry.register_periodic_task(tasks.guard()),
            Err(RegistryError::PeriodicTaskActive)
        );
        assert_eq!(tasks.live(), 1);
        assert_eq!(tasks.created(), 2);

        registry.clear_all();
        registry.register_periodic_task(tasks.guard()).unwrap();
        assert_eq!(tasks.live(), 1);
    }

    #[test]
    fn test_listeners_keep_registration_order() {
        let listeners = GuardCounter::default();
        let mut registry = registry();

        registry.register_click_delegate(listeners.guard());
        registry.register_listener("input", ListenerTarget::Element("length_to"), listeners.guard());

        let recorded: Vec<_> = registry.listeners().collect();
        assert_eq!(
            recorded,
            vec![
                ("click", ListenerTarget::Document),
                ("input", ListenerTarget::Element("length_to")),
            ]
        );
    }
}
