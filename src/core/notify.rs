//! # Subscribe / Notify
//!
//! Each store (navigation, search, settings) owns a `Subscribers<E>` list and
//! calls `notify` after every successful mutation. Listeners are plain
//! closures; there are no globals and no background delivery.

use std::fmt;

pub type SubscriberId = usize;

pub struct Subscribers<E> {
    next_id: SubscriberId,
    listeners: Vec<(SubscriberId, Box<dyn FnMut(&E)>)>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a listener. The returned id is used to unsubscribe.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if no listener had that id.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener in subscription order.
    pub fn notify(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_reaches_all_listeners_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subs: Subscribers<u32> = Subscribers::new();

        let a = seen.clone();
        subs.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = seen.clone();
        subs.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        subs.notify(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut subs: Subscribers<()> = Subscribers::new();

        let c = count.clone();
        let id = subs.subscribe(move |_| *c.borrow_mut() += 1);
        subs.notify(&());
        assert!(subs.unsubscribe(id));
        subs.notify(&());

        assert_eq!(*count.borrow(), 1);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_unsubscribe_unknown_id() {
        let mut subs: Subscribers<()> = Subscribers::new();
        subs.subscribe(|_| {});
        assert!(!subs.unsubscribe(42));
        assert_eq!(subs.len(), 1);
    }
}
