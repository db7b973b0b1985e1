//! Typed indices into the polygon mesh arena.
//!
//! Vertices, half-edges, faces and rings live in flat vectors and refer to each
//! other by index. Each kind of element gets its own wrapper so a half-edge id
//! can never be used where a vertex id is expected. The wrappers are generic over
//! the integer width ([`MeshIndex`]): `u16` is enough for most field boundaries,
//! `u32` is the default, and `u64` is available for very large inputs.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as mesh indices.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The largest index that can be stored.
    const MAX: Self;

    /// Sentinel for "no element".
    const INVALID: Self;

    /// Convert from usize.
    ///
    /// # Panics
    /// Panics in debug builds if the value does not fit.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a valid (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// Number of elements an arena indexed by this type can hold.
    fn capacity() -> usize {
        Self::MAX.to_usize().saturating_add(1)
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= Self::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// A polygon vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A directed half-edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// A face: one closed cycle of interior half-edges.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

/// A boundary ring of the input polygon. Ring 0 is the outer ring.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct RingId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create an index from a raw position.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Create the "no element" index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Position in the owning arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// The underlying integer.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl<I: MeshIndex> fmt::Display for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Debug::fmt(self, f)
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");
impl_index_type!(RingId, "R");
