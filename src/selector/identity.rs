use std::rc::Rc;
use std::sync::Arc;

/// Change detection for selector results.
///
/// A subscription is notified when the freshly selected value is not the
/// [`same`](Identity::same) as the one it saw last. Plain values compare by
/// value. Shared containers compare by identity: two `Arc`s are the same only
/// when they point at the same allocation, no matter what they contain.
///
/// This mirrors how state is updated. An action that changes a container
/// field must install a *new* `Arc`; one that mutates the contents behind the
/// existing pointer (for example through `Arc::get_mut` or interior
/// mutability) will not be seen by subscribers keyed on that field.
///
/// ```
/// use std::sync::Arc;
/// use larder::selector::Identity;
///
/// let ids = Arc::new(vec![1, 2]);
/// assert!(ids.same(&Arc::clone(&ids)));
/// assert!(!ids.same(&Arc::new(vec![1, 2])));
/// assert!(3i32.same(&3));
/// ```
pub trait Identity {
    /// Whether `other` should be treated as unchanged relative to `self`.
    fn same(&self, other: &Self) -> bool;
}

macro_rules! value_identity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identity for $ty {
                #[inline]
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_identity!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    &'static str,
);

// Bitwise, so NaN is the same as NaN while 0.0 and -0.0 differ.
impl Identity for f32 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Identity for f64 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! tuple_identity {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: Identity),+> Identity for ($($name,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$idx.same(&other.$idx))&&+
            }
        }
    };
}

tuple_identity!(A.0);
tuple_identity!(A.0, B.1);
tuple_identity!(A.0, B.1, C.2);
tuple_identity!(A.0, B.1, C.2, D.3);
