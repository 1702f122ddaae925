//! # Array Metadata Module
//!
//! Per-array-instance ancillary data: one stride/size pair per iterable
//! dimension. Metadata lives adjacent to, but independent of, the type
//! descriptor — two arrays of the same type can walk entirely different
//! memory layouts (contiguous, reversed, inner-sliced) purely through their
//! metadata. Lifetime is owned by the array instance; descriptors construct
//! the default row-major layout via [`crate::DataType::default_metadata`].

/// Size and byte stride of one iterable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimMeta {
    /// Number of elements along this axis.
    pub size: usize,
    /// Byte distance between consecutive elements along this axis.
    /// Negative strides walk the axis in reverse.
    pub stride: isize,
}

/// Per-array dimension metadata, outermost axis first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayMeta {
    pub dims: Vec<DimMeta>,
}

impl ArrayMeta {
    /// Metadata for a zero-depth (scalar) array.
    #[inline]
    pub fn scalar() -> Self {
        ArrayMeta { dims: Vec::new() }
    }

    /// C-contiguous (row-major) layout for `shape` with the given leaf
    /// element size: the innermost axis has stride `element_size`.
    pub fn row_major(shape: &[usize], element_size: usize) -> Self {
        let mut dims = vec![
            DimMeta {
                size: 0,
                stride: 0
            };
            shape.len()
        ];
        let mut stride = element_size as isize;
        for (i, &size) in shape.iter().enumerate().rev() {
            dims[i] = DimMeta { size, stride };
            stride *= size as isize;
        }
        ArrayMeta { dims }
    }

    /// Number of iterable dimensions described.
    #[inline]
    pub fn depth(&self) -> usize {
        self.dims.len()
    }

    /// Axis sizes, outermost first.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|d| d.size).collect()
    }

    /// Product of all axis sizes. A zero-size axis makes this zero.
    pub fn element_count(&self) -> usize {
        self.dims.iter().map(|d| d.size).product()
    }

    /// True when the layout is exactly row-major contiguous for
    /// `element_size`.
    pub fn is_contiguous(&self, element_size: usize) -> bool {
        let mut stride = element_size as isize;
        for d in self.dims.iter().rev() {
            if d.stride != stride {
                return false;
            }
            stride *= d.size as isize;
        }
        true
    }
}
