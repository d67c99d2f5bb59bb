//! Deferred-resolution cells and reference fields

use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Write-once slot standing in for an object that may not exist yet
///
/// Every holder of the same id shares one cell, so filling it once makes the
/// object visible to all of them. The cell holds a [`Weak`]: the object is owned
/// by the place where its literal was decoded.
pub struct Slot<T>(Rc<OnceCell<Weak<T>>>);

impl<T> Slot<T> {
    /// Empty cell awaiting its object
    pub fn pending() -> Self {
        Slot(Rc::new(OnceCell::new()))
    }

    /// Cell already pointing at `object`
    pub fn resolved(object: &Rc<T>) -> Self {
        Self::from_weak(Rc::downgrade(object))
    }

    /// Cell pointing at an existing weak handle
    pub fn from_weak(weak: Weak<T>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(weak);
        Slot(Rc::new(cell))
    }

    /// Whether the cell has been filled
    pub fn is_resolved(&self) -> bool {
        self.0.get().is_some()
    }

    /// The object, once resolved and still alive
    pub fn get(&self) -> Option<Rc<T>> {
        self.0.get().and_then(Weak::upgrade)
    }

    /// Whether both handles share the same cell
    pub fn same_cell(&self, other: &Slot<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn target_ptr(&self) -> Option<*const T> {
        self.0.get().map(Weak::as_ptr)
    }

    /// Fill the cell; `false` when it already holds a different object.
    pub(crate) fn fill(&self, object: &Rc<T>) -> bool {
        let weak = Rc::downgrade(object);
        match self.0.get() {
            Some(existing) => Weak::ptr_eq(existing, &weak),
            None => {
                let _ = self.0.set(weak);
                true
            }
        }
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Slot(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_resolved() { "resolved" } else { "pending" };
        f.debug_tuple("Slot").field(&state).finish()
    }
}

/// Field holding a possibly shared, possibly cyclic reference
///
/// `Owned` is produced where the object literal itself was decoded; `Linked`
/// is produced for a bare id and resolves through the registry cell. Since the
/// first occurrence of an object is always its literal, ownership follows the
/// serialized tree and cycles never form strong reference loops.
pub enum Ref<T> {
    /// The object literal appeared here
    Owned(Rc<T>),
    /// A bare id pointing elsewhere
    Linked(Slot<T>),
}

impl<T> Ref<T> {
    /// Owning reference to a new object
    pub fn new(value: T) -> Self {
        Ref::Owned(Rc::new(value))
    }

    /// Non-owning reference to `target`
    pub fn link(target: &Rc<T>) -> Self {
        Ref::Linked(Slot::resolved(target))
    }

    /// Non-owning reference from a weak handle, e.g. inside [`Rc::new_cyclic`]
    pub fn from_weak(weak: Weak<T>) -> Self {
        Ref::Linked(Slot::from_weak(weak))
    }

    /// The referenced object, if resolved and alive
    pub fn get(&self) -> Option<Rc<T>> {
        match self {
            Ref::Owned(rc) => Some(Rc::clone(rc)),
            Ref::Linked(slot) => slot.get(),
        }
    }

    /// Whether this position owns the object
    pub fn is_owned(&self) -> bool {
        matches!(self, Ref::Owned(_))
    }

    /// Whether the target is known
    pub fn is_resolved(&self) -> bool {
        match self {
            Ref::Owned(_) => true,
            Ref::Linked(slot) => slot.is_resolved(),
        }
    }

    fn target_ptr(&self) -> Option<*const T> {
        match self {
            Ref::Owned(rc) => Some(Rc::as_ptr(rc)),
            Ref::Linked(slot) => slot.target_ptr(),
        }
    }

    /// Whether this reference designates `target` (pointer identity)
    pub fn points_to(&self, target: &Rc<T>) -> bool {
        self.target_ptr() == Some(Rc::as_ptr(target))
    }

    /// Whether both references designate the same resolved object
    pub fn ptr_eq(&self, other: &Ref<T>) -> bool {
        match (self.target_ptr(), other.target_ptr()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        match self {
            Ref::Owned(rc) => Ref::Owned(Rc::clone(rc)),
            Ref::Linked(slot) => Ref::Linked(slot.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ref::Owned(rc) => f.debug_tuple("Owned").field(&**rc).finish(),
            // Never follow links: they may close a cycle.
            Ref::Linked(slot) => f.debug_tuple("Linked").field(slot).finish(),
        }
    }
}
