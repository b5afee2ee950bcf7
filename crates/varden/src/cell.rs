//! Single-threaded observable cells.
//!
//! [`Signal`] is a shared value with change listeners. [`Memo`] caches a
//! value derived from a signal and recomputes it lazily after the signal
//! changes. Listeners run synchronously after each change and receive a
//! snapshot of the new value. A listener may write back to any signal,
//! including the one notifying it; the nested change notifies again before
//! the outer notification continues, so such listeners must stop writing
//! once the value they want is in place.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub type ListenerId = u64;

type Listener<T> = Rc<dyn Fn(&T)>;

struct SignalInner<T> {
    value: RefCell<T>,
    next_listener_id: Cell<ListenerId>,
    listeners: RefCell<BTreeMap<ListenerId, Listener<T>>>,
}

pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                next_listener_id: Cell::new(1),
                listeners: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.borrow())
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id.saturating_add(1));
        self.inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(listener));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl<T: Clone + 'static> Signal<T> {
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Store `value` only if it differs from the current one. Returns whether
    /// listeners were notified.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        if *self.inner.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut *self.inner.value.borrow_mut());
        self.notify();
        out
    }

    /// Like [`Signal::update`], but listeners only run when `f` succeeds.
    pub fn try_update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let out = f(&mut *self.inner.value.borrow_mut())?;
        self.notify();
        Ok(out)
    }

    fn notify(&self) {
        // Snapshot so listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener<T>> =
            self.inner.listeners.borrow().values().cloned().collect();
        if listeners.is_empty() {
            return;
        }
        // No borrow is held while listeners run, so they may write back.
        let value = self.inner.value.borrow().clone();
        for listener in listeners {
            listener(&value);
        }
    }
}

/// Read-only view of a [`Signal`].
pub struct ReadSignal<T>(Signal<T>);

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        self.0.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.0.unsubscribe(id)
    }
}

impl<T> From<Signal<T>> for ReadSignal<T> {
    fn from(signal: Signal<T>) -> Self {
        Self(signal)
    }
}

struct MemoInner<T> {
    compute: Box<dyn Fn() -> T>,
    cached: RefCell<Option<T>>,
    detach: Box<dyn Fn()>,
}

impl<T> Drop for MemoInner<T> {
    fn drop(&mut self) {
        (self.detach)();
    }
}

/// Cached derivation over one [`Signal`].
pub struct Memo<T> {
    inner: Rc<MemoInner<T>>,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Memo<T> {
    pub fn new<S: 'static>(source: &Signal<S>, derive: impl Fn(&S) -> T + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &std::rc::Weak<MemoInner<T>>| {
            let weak = weak.clone();
            let listener_id = source.subscribe(move |_| {
                if let Some(memo) = weak.upgrade() {
                    memo.cached.borrow_mut().take();
                }
            });
            let reader = source.clone();
            let detacher = source.clone();
            MemoInner {
                compute: Box::new(move || reader.with(&derive)),
                cached: RefCell::new(None),
                detach: Box::new(move || {
                    detacher.unsubscribe(listener_id);
                }),
            }
        });
        Self { inner }
    }

    pub fn get(&self) -> T {
        if let Some(hit) = self.inner.cached.borrow().as_ref() {
            return hit.clone();
        }
        let fresh = (self.inner.compute)();
        *self.inner.cached.borrow_mut() = Some(fresh.clone());
        fresh
    }

    pub fn is_cached(&self) -> bool {
        self.inner.cached.borrow().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("cached", &self.inner.cached.borrow())
            .finish()
    }
}
