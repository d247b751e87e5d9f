//! Change notification for maps.
//!
//! Observers are called synchronously, in-line with the learning call that
//! triggered them. Anything expensive (redrawing, writing files) should be
//! handed off to the observer's own thread, e.g. through a channel.

use crate::som::SelfOrganizingMap;
use std::sync::Arc;

/// Receives a call every time a map signals that its prototypes changed.
pub trait SomObserver: Send + Sync {
    /// Called after a batch of prototype mutations.
    fn on_notify(&self, som: &SelfOrganizingMap);
}

impl<F> SomObserver for F
where
    F: Fn(&SelfOrganizingMap) + Send + Sync,
{
    fn on_notify(&self, som: &SelfOrganizingMap) {
        self(som)
    }
}

/// Handle returned by [`SelfOrganizingMap::add_observer`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Arc<dyn SomObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn add(&mut self, observer: Arc<dyn SomObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<dyn SomObserver>> {
        self.observers.iter().map(|(_, observer)| observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::som::SelfOrganizingMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_registry_ids_are_unique() {
        let mut registry = ObserverRegistry::default();
        let a = registry.add(Arc::new(|_: &SelfOrganizingMap| {}));
        let b = registry.add(Arc::new(|_: &SelfOrganizingMap| {}));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_struct_observer() {
        struct Counter(AtomicUsize);

        impl SomObserver for Counter {
            fn on_notify(&self, _som: &SelfOrganizingMap) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let mut registry = ObserverRegistry::default();
        registry.add(counter.clone());
        assert_eq!(registry.iter().count(), 1);
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }
}
