//! Back-reference propagation
//!
//! Once a composite value is built, its decoder offers each child the pair
//! (reference name, holder) through [`ValueDecoder::set_back_reference`].
//! Container decoders forward the offer to every element, so values nested in
//! generic containers learn their context without the container knowing their
//! type.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::context::DecodeContext;
use crate::decode::ValueDecoder;

/// Type-erased identity of the object holding a reference
pub type Holder = Rc<dyn Any>;

/// Erase a bean handle into a [`Holder`]
pub fn holder_of<T: 'static>(bean: &Rc<T>) -> Holder {
    Rc::clone(bean) as Holder
}

/// Recover the concrete holder type, if it matches
pub fn holder_as<T: 'static>(holder: &Holder) -> Option<Rc<T>> {
    Rc::clone(holder).downcast::<T>().ok()
}

/// Whether `holder` is exactly `bean`
pub fn is_holder_of<T: 'static>(holder: &Holder, bean: &Rc<T>) -> bool {
    Rc::as_ptr(holder) as *const () == Rc::as_ptr(bean) as *const ()
}

/// Offer `value` the back-reference `(name, holder)` through its decoder
pub fn propagate<D: ValueDecoder + ?Sized>(
    decoder: &D,
    name: &str,
    holder: &Holder,
    value: &D::Value,
    ctx: &mut DecodeContext,
) {
    trace!(reference = name, "propagate back-reference");
    decoder.set_back_reference(name, holder, value, ctx);
}

/// One delivered back-reference
#[derive(Clone)]
pub struct BackReference {
    name: String,
    holder: Weak<dyn Any>,
}

impl BackReference {
    /// Member name through which the value was reached
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The holding object, while it is alive
    pub fn holder(&self) -> Option<Holder> {
        self.holder.upgrade()
    }

    /// Whether the holder is exactly `bean`
    pub fn is_held_by<T: 'static>(&self, bean: &Rc<T>) -> bool {
        self.holder.as_ptr() as *const () == Rc::as_ptr(bean) as *const ()
    }
}

impl std::fmt::Debug for BackReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackReference")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Storage a value can embed to receive back-references
///
/// Holders are kept as weak handles so a child pointing at its parent never
/// keeps the parent alive.
#[derive(Debug, Default)]
pub struct Backlinks(RefCell<Vec<BackReference>>);

impl Backlinks {
    /// Empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a delivery
    pub fn record(&self, name: &str, holder: &Holder) {
        self.0.borrow_mut().push(BackReference {
            name: name.to_string(),
            holder: Rc::downgrade(holder),
        });
    }

    /// Number of deliveries received
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing was delivered
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// All deliveries, in arrival order
    pub fn all(&self) -> Vec<BackReference> {
        self.0.borrow().clone()
    }

    /// Holder delivered under `name`, most recent first
    pub fn holder(&self, name: &str) -> Option<Holder> {
        self.0
            .borrow()
            .iter()
            .rev()
            .find(|r| r.name == name)
            .and_then(BackReference::holder)
    }
}
