//! # Type Descriptor Module
//!
//! Runtime type descriptors: immutable, reference-counted descriptions of
//! element layout that arrays carry instead of compile-time types.
//!
//! # Design
//! A [`DataType`] is a shared handle (`Rc`) over an immutable [`TypeDesc`].
//! The per-kind behaviour — shape query, iteration depth, metadata
//! construction, cursor construction, equality, lossless-assignment
//! compatibility — is a closed capability set implemented over the
//! [`TypeKind`] tagged variants, rather than an open inheritance hierarchy.
//! Sharing a descriptor is `acquire()` (an `Rc` clone); release is `Drop`;
//! the description is destroyed when the last handle goes away. Counts are
//! non-atomic: descriptors are not for cross-thread sharing.

use std::fmt;
use std::rc::Rc;

use crate::enums::scalar_type::ScalarType;
use crate::iterate::cursor::{DimCursor, StridedCursor};
use crate::structs::metadata::ArrayMeta;
use crate::utils::align_up;
use crate::{DimMeta, DynarrError};

/// One named member of a struct type, at a fixed byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub dtype: DataType,
    /// Byte offset of this field within one struct element.
    pub offset: usize,
}

/// The closed set of type kinds the core understands.
///
/// The full per-kind registry (strings, expression types, variable-length
/// dimensions, ...) lives a layer above this crate; these are the kinds the
/// execution path itself composes over.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// A fixed-width machine scalar.
    Scalar(ScalarType),
    /// A fixed-size iterable dimension over an element type. The stride
    /// lives in per-array metadata, not here.
    FixedDim { size: usize, element: DataType },
    /// A record of named fields at fixed offsets.
    Struct {
        fields: Vec<StructField>,
        size: usize,
        align: usize,
    },
}

/// Immutable payload behind a [`DataType`] handle.
#[derive(Debug, PartialEq)]
pub struct TypeDesc {
    kind: TypeKind,
}

/// Shared, immutable runtime type descriptor.
#[derive(Debug, Clone)]
pub struct DataType {
    inner: Rc<TypeDesc>,
}

impl DataType {
    /// Descriptor for a machine scalar.
    pub fn scalar(st: ScalarType) -> Self {
        DataType {
            inner: Rc::new(TypeDesc {
                kind: TypeKind::Scalar(st),
            }),
        }
    }

    /// Descriptor for a fixed-size dimension over `element`.
    pub fn fixed_dim(size: usize, element: DataType) -> Self {
        DataType {
            inner: Rc::new(TypeDesc {
                kind: TypeKind::FixedDim { size, element },
            }),
        }
    }

    /// Descriptor for `shape.len()` nested fixed dimensions over `element`.
    pub fn fixed_dims(shape: &[usize], element: DataType) -> Self {
        let mut dt = element;
        for &size in shape.iter().rev() {
            dt = DataType::fixed_dim(size, dt);
        }
        dt
    }

    /// Descriptor for a struct with naturally aligned, padded field layout.
    pub fn record<S: Into<String>>(fields: Vec<(S, DataType)>) -> Self {
        let mut out = Vec::with_capacity(fields.len());
        let mut offset = 0usize;
        let mut align = 1usize;
        for (name, dtype) in fields {
            let field_align = dtype.alignment();
            align = align.max(field_align);
            offset = align_up(offset, field_align);
            let size = dtype.data_size();
            out.push(StructField {
                name: name.into(),
                dtype,
                offset,
            });
            offset += size;
        }
        let size = align_up(offset, align);
        DataType {
            inner: Rc::new(TypeDesc {
                kind: TypeKind::Struct {
                    fields: out,
                    size,
                    align,
                },
            }),
        }
    }

    /// Returns an equally-owning handle to the same description.
    ///
    /// Identical to `clone()`; named for symmetry with
    /// [`crate::MemoryBlock::acquire`].
    #[inline]
    pub fn acquire(&self) -> DataType {
        self.clone()
    }

    /// Number of live handles to this description.
    #[inline]
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.inner.kind
    }

    /// Number of leading iterable dimensions before the leaf element.
    pub fn iteration_depth(&self) -> usize {
        match self.kind() {
            TypeKind::FixedDim { element, .. } => 1 + element.iteration_depth(),
            _ => 0,
        }
    }

    /// The element type below all leading dimensions.
    pub fn leaf(&self) -> DataType {
        match self.kind() {
            TypeKind::FixedDim { element, .. } => element.leaf(),
            _ => self.clone(),
        }
    }

    /// The leaf scalar kind, when the leaf is a scalar.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self.leaf().kind() {
            TypeKind::Scalar(st) => Some(*st),
            _ => None,
        }
    }

    /// Total bytes of one value of this type, dimensions included.
    pub fn data_size(&self) -> usize {
        match self.kind() {
            TypeKind::Scalar(st) => st.size_bytes(),
            TypeKind::FixedDim { size, element } => size * element.data_size(),
            TypeKind::Struct { size, .. } => *size,
        }
    }

    /// Required alignment of one value of this type.
    pub fn alignment(&self) -> usize {
        match self.kind() {
            TypeKind::Scalar(st) => st.alignment(),
            TypeKind::FixedDim { element, .. } => element.alignment(),
            TypeKind::Struct { align, .. } => *align,
        }
    }

    /// Shape query hook: axis sizes for an array instance, outermost first.
    ///
    /// Sizes are read from the metadata, which is authoritative for
    /// iteration; they agree with the descriptor's own dimension sizes by
    /// construction.
    pub fn shape(&self, meta: &ArrayMeta) -> Vec<usize> {
        debug_assert_eq!(meta.depth(), self.iteration_depth());
        meta.shape()
    }

    /// Metadata construction hook: default C-contiguous layout.
    pub fn default_metadata(&self) -> ArrayMeta {
        let mut sizes = Vec::new();
        let mut dt = self.clone();
        loop {
            let next = match dt.kind() {
                TypeKind::FixedDim { size, element } => {
                    sizes.push(*size);
                    element.clone()
                }
                _ => break,
            };
            dt = next;
        }
        ArrayMeta::row_major(&sizes, dt.data_size())
    }

    /// Cursor construction hook: a traversal cursor for this operand,
    /// wrapped to the resolved broadcast shape. Extra leading axes and
    /// size-1 axes become zero-stride no-ops.
    pub fn cursor(
        &self,
        meta: &ArrayMeta,
        broadcast_shape: &[usize],
    ) -> Result<Box<dyn DimCursor>, DynarrError> {
        let cursor = StridedCursor::broadcast_to(meta, broadcast_shape)?;
        Ok(Box::new(cursor))
    }

    /// Lossless-assignment hook: true when every value of `src` can be
    /// assigned into `self` without loss.
    pub fn is_lossless_assignable(&self, src: &DataType) -> bool {
        match (self.kind(), src.kind()) {
            (TypeKind::Scalar(d), TypeKind::Scalar(s)) => d.losslessly_assignable_from(*s),
            (
                TypeKind::FixedDim {
                    size: ds,
                    element: de,
                },
                TypeKind::FixedDim {
                    size: ss,
                    element: se,
                },
            ) => ds == ss && de.is_lossless_assignable(se),
            (TypeKind::Struct { fields: df, .. }, TypeKind::Struct { fields: sf, .. }) => {
                df.len() == sf.len()
                    && df
                        .iter()
                        .zip(sf.iter())
                        .all(|(d, s)| d.dtype.is_lossless_assignable(&s.dtype))
            }
            _ => false,
        }
    }

    /// The dimension metadata a freshly allocated, contiguous array of this
    /// type uses. Convenience over [`Self::default_metadata`] for callers
    /// that also need the dims.
    pub fn contiguous_dims(&self) -> Vec<DimMeta> {
        self.default_metadata().dims
    }
}

/// Structural equality, with a pointer-identity fast path for shared
/// handles.
impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TypeKind::Scalar(st) => f.write_str(st.name()),
            TypeKind::FixedDim { size, element } => write!(f, "{} * {}", size, element),
            TypeKind::Struct { fields, .. } => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.dtype)?;
                }
                write!(f, "}}")
            }
        }
    }
}
