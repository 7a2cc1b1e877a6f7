use std::cell::RefCell;
use std::rc::Rc;

/// Handle returned by [`Emitter::subscribe`]; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

struct Inner<T> {
    next_id: u64,
    listeners: Vec<(Subscription, Listener<T>)>,
    emitting: bool,
    in_flight: Vec<Subscription>,
    removed_while_emitting: Vec<Subscription>,
    cleared_while_emitting: bool,
}

/// Same-page publish/subscribe channel. Cloning yields another handle to the
/// same listener list.
pub struct Emitter<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 0,
                listeners: Vec::new(),
                emitting: false,
                in_flight: Vec::new(),
                removed_while_emitting: Vec::new(),
                cleared_while_emitting: false,
            })),
        }
    }
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = Subscription(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` for ids that are not currently subscribed. A listener
    /// removed during delivery is skipped for the rest of that delivery.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(id, _)| *id != subscription);
        if inner.listeners.len() != before {
            return true;
        }
        let running = inner.emitting
            && !inner.cleared_while_emitting
            && inner.in_flight.contains(&subscription)
            && !inner.removed_while_emitting.contains(&subscription);
        if running {
            inner.removed_while_emitting.push(subscription);
        }
        running
    }

    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        if inner.emitting {
            inner.cleared_while_emitting = true;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to every listener in subscription order.
    ///
    /// Listeners are taken out of the list while they run, so a listener may
    /// subscribe or unsubscribe on this emitter without a borrow conflict.
    /// Listeners added during delivery only see later events. A nested emit
    /// from inside a listener is dropped.
    pub fn emit(&self, event: &T) {
        let mut running = {
            let mut inner = self.inner.borrow_mut();
            if inner.emitting {
                return;
            }
            inner.emitting = true;
            let running = std::mem::take(&mut inner.listeners);
            inner.in_flight = running.iter().map(|(id, _)| *id).collect();
            running
        };
        for (id, listener) in running.iter_mut() {
            let skip = {
                let inner = self.inner.borrow();
                inner.cleared_while_emitting || inner.removed_while_emitting.contains(id)
            };
            if !skip {
                listener(event);
            }
        }
        let mut inner = self.inner.borrow_mut();
        inner.emitting = false;
        inner.in_flight.clear();
        let added = std::mem::take(&mut inner.listeners);
        let removed = std::mem::take(&mut inner.removed_while_emitting);
        if std::mem::take(&mut inner.cleared_while_emitting) {
            running.clear();
        }
        running.retain(|(id, _)| !removed.contains(id));
        running.extend(added);
        inner.listeners = running;
    }
}

/// Fired once after the loading sequence has revealed the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentLoaded;
