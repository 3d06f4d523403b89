// Observable state module
// Replay-latest value cells and payload-free triggers for the presentation layer

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// Ordered list of callbacks shared by `Observable` and `Trigger`
struct Subscribers<T: 'static> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T: 'static> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    fn add(&self, callback: impl FnMut(&T) + 'static) -> (SubscriptionId, Callback<T>) {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        self.entries.borrow_mut().push((id, Rc::clone(&callback)));
        (id, callback)
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Call every subscriber registered at the moment of the call.
    ///
    /// The list is snapshotted first so callbacks can subscribe or unsubscribe
    /// freely. A callback already running further up the stack (a trigger
    /// fired from its own handler) is skipped.
    fn notify(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            if let Ok(mut guard) = callback.try_borrow_mut() {
                let callback = &mut *guard;
                callback(value);
            }
        }
    }
}

/// A value cell that replays its current value to new subscribers and
/// pushes every later update to all of them
pub struct Observable<T: Clone + 'static> {
    value: RefCell<T>,
    subscribers: Subscribers<T>,
    /// Values set while a notification pass is running
    pending: RefCell<VecDeque<T>>,
    delivering: Cell<bool>,
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            subscribers: Subscribers::new(),
            pending: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value and notify subscribers, even when it did not change.
    ///
    /// A set made from inside a subscriber is delivered once the running pass
    /// is over, so every subscriber sees values in order.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        self.pending.borrow_mut().push_back(value);
        if self.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(value) = next else { break };
            self.subscribers.notify(&value);
        }
        self.delivering.set(false);
    }

    /// Replace the value with one derived from the current value
    pub fn update(&self, next: impl FnOnce(&T) -> T) {
        let value = {
            let current = self.value.borrow();
            next(&current)
        };
        self.set(value);
    }

    /// Register `callback`; it runs right away with the current value
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let (id, callback) = self.subscribers.add(callback);
        let current = self.get();
        if let Ok(mut guard) = callback.try_borrow_mut() {
            let callback = &mut *guard;
            callback(&current);
        }
        id
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.borrow())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// A payload-free event source, e.g. a button tap
pub struct Trigger {
    subscribers: Subscribers<()>,
}

impl Trigger {
    pub fn new() -> Self {
        Self {
            subscribers: Subscribers::new(),
        }
    }

    pub fn subscribe(&self, mut callback: impl FnMut() + 'static) -> SubscriptionId {
        self.subscribers.add(move |_: &()| callback()).0
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Deliver one event to every subscriber
    pub fn fire(&self) {
        self.subscribers.notify(&());
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
