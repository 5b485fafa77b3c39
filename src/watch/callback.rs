//! Opaque callback reference for the outbound notification.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::ChangeStream;

/// C-ABI shape of the native "interfaces may have changed" callback.
pub type NativeCallback = extern "C" fn();

/// Opaque handle to the consumer's notification target.
///
/// The bridge stores and invokes the reference but never owns or frees
/// what it points to. Clones share the same target.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use netwatch_bridge::watch::CallbackRef;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// let callback = CallbackRef::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// callback.invoke();
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct CallbackRef {
    target: Target,
}

#[derive(Clone)]
enum Target {
    Closure(Arc<dyn Fn() + Send + Sync>),
    Native(NativeCallback),
    Channel(mpsc::UnboundedSender<()>),
    Null,
}

impl CallbackRef {
    /// Wraps an in-process closure.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            target: Target::Closure(Arc::new(callback)),
        }
    }

    /// Wraps a native function pointer.
    #[must_use]
    pub const fn from_native(callback: NativeCallback) -> Self {
        Self {
            target: Target::Native(callback),
        }
    }

    /// Rebuilds a native callback from the integer form it takes when passed
    /// through a managed runtime as a `long`.
    ///
    /// Zero, or a value that does not fit a pointer, yields a null reference
    /// whose invocation does nothing.
    ///
    /// # Safety
    ///
    /// A non-zero `address` must be the address of a function with the
    /// [`NativeCallback`] signature that stays valid for as long as this
    /// reference (or any clone) may be invoked.
    #[must_use]
    pub unsafe fn from_raw_address(address: i64) -> Self {
        let Ok(address) = usize::try_from(address) else {
            return Self::null();
        };
        if address == 0 {
            return Self::null();
        }
        let pointer = address as *const ();
        // SAFETY: the caller guarantees `address` points to a live
        // `extern "C" fn()`.
        let callback = unsafe { std::mem::transmute::<*const (), NativeCallback>(pointer) };
        Self::from_native(callback)
    }

    /// A reference with no target.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            target: Target::Null,
        }
    }

    /// Creates a reference paired with a [`ChangeStream`] that yields one item
    /// per invocation.
    ///
    /// The stream ends once every clone of the returned reference is dropped.
    #[must_use]
    pub fn channel() -> (Self, ChangeStream) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let callback = Self {
            target: Target::Channel(sender),
        };
        (callback, ChangeStream::new(receiver))
    }

    /// Returns `true` if invoking this reference does nothing.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.target, Target::Null)
    }

    /// Invokes the target synchronously on the calling thread.
    pub fn invoke(&self) {
        match &self.target {
            Target::Closure(callback) => callback(),
            Target::Native(callback) => callback(),
            Target::Channel(sender) => {
                // Receiver dropped: nobody is listening any more
                let _ = sender.send(());
            }
            Target::Null => {}
        }
    }
}

impl fmt::Debug for CallbackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.target {
            Target::Closure(_) => "closure",
            Target::Native(_) => "native",
            Target::Channel(_) => "channel",
            Target::Null => "null",
        };
        f.debug_struct("CallbackRef")
            .field("target", &kind)
            .finish()
    }
}
