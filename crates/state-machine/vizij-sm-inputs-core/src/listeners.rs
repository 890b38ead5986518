//! Listener handles for inputs the host did not declare as properties.
//!
//! `listen_to("Speed")` hands out a shared [`ListenerHandle`] whose cached value
//! the sync pass keeps current. One handle exists per normalized key; all handles
//! are detached and dropped on every registry rebuild. A host still holding a
//! detached handle keeps its last value but receives no further updates.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::names::{normalize, InputKey};
use crate::Value;

type Subscriber = Box<dyn FnMut(&Value)>;

struct HandleState {
    key: InputKey,
    value: RefCell<Option<Value>>,
    attached: Cell<bool>,
    subscribers: RefCell<Vec<Subscriber>>,
}

/// Shared, host-consumable view of one input value.
#[derive(Clone)]
pub struct ListenerHandle(Rc<HandleState>);

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("key", &self.0.key)
            .field("value", &self.0.value.borrow())
            .field("attached", &self.0.attached.get())
            .finish()
    }
}

impl ListenerHandle {
    fn new(key: InputKey, initial: Option<Value>, attached: bool) -> Self {
        Self(Rc::new(HandleState {
            key,
            value: RefCell::new(initial),
            attached: Cell::new(attached),
            subscribers: RefCell::new(Vec::new()),
        }))
    }

    /// A handle that is not owned by any hub and never updates.
    pub fn detached(name: &str) -> Self {
        Self::new(normalize(name), None, false)
    }

    pub fn key(&self) -> &InputKey {
        &self.0.key
    }

    /// Cached value; `None` for triggers and unresolved names.
    pub fn value(&self) -> Option<Value> {
        self.0.value.borrow().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.0.attached.get()
    }

    /// Same underlying handle (pointer identity).
    pub fn ptr_eq(&self, other: &ListenerHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Subscribe to value changes.
    pub fn on_change(&self, f: impl FnMut(&Value) + 'static) {
        self.0.subscribers.borrow_mut().push(Box::new(f));
    }

    /// Store `value` and notify subscribers. Returns false (and stays silent) when
    /// the value is unchanged or the handle is detached.
    pub(crate) fn set_value(&self, value: Value) -> bool {
        if !self.is_attached() || self.0.value.borrow().as_ref() == Some(&value) {
            return false;
        }
        *self.0.value.borrow_mut() = Some(value.clone());

        // subscribers may register further subscribers on this handle
        let mut current = std::mem::take(&mut *self.0.subscribers.borrow_mut());
        for subscriber in current.iter_mut() {
            subscriber(&value);
        }
        let mut slot = self.0.subscribers.borrow_mut();
        current.append(&mut slot);
        *slot = current;
        true
    }

    fn detach(&self) {
        self.0.attached.set(false);
    }
}

/// Lazily populated key -> handle table.
#[derive(Debug, Default)]
pub struct DynamicPropertyHub {
    handles: HashMap<InputKey, ListenerHandle>,
}

impl DynamicPropertyHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `name` (any casing), creating it with `init()` as its
    /// initial value on first request.
    pub fn subscribe(&mut self, name: &str, init: impl FnOnce() -> Option<Value>) -> ListenerHandle {
        let key = normalize(name);
        if let Some(handle) = self.handles.get(&key) {
            return handle.clone();
        }
        let handle = ListenerHandle::new(key.clone(), init(), true);
        self.handles.insert(key, handle.clone());
        handle
    }

    pub fn get(&self, name: &str) -> Option<&ListenerHandle> {
        self.handles.get(normalize(name).as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InputKey, &ListenerHandle)> {
        self.handles.iter()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Detach and drop every handle.
    pub fn clear(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.detach();
        }
    }
}
