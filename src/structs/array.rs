//! # **Array** — *Dynamically typed n-dimensional array*
//!
//! The user-facing array handle: a runtime type descriptor, per-dimension
//! size/stride metadata, a shared [`MemoryBlock`], and a byte offset to the
//! first element. Cloning an array clones the handle, not the bytes; two
//! handles over one block see each other's writes.

use crate::enums::error::DynarrError;
use crate::iterate::cursor::StridedCursor;
use crate::iterate::driver::IterDriver;
use crate::shape::broadcast::BroadcastShape;
use crate::structs::memory_block::MemoryBlock;
use crate::structs::metadata::ArrayMeta;
use crate::structs::type_descriptor::DataType;
use crate::traits::element::Element;
use crate::utils::{read_scalar, write_scalar};

/// A dynamically typed n-dimensional array over shared storage.
#[derive(Debug, Clone)]
pub struct Array {
    dtype: DataType,
    meta: ArrayMeta,
    block: MemoryBlock,
    /// Byte offset of the first element within the block.
    offset: usize,
}

impl Array {
    /// One-dimensional array from a slice of scalars.
    pub fn from_slice<T: Element>(values: &[T]) -> Self {
        Array::from_shape_slice(&[values.len()], values)
    }

    /// Row-major array of `shape` from a flat slice of scalars.
    ///
    /// # Panics
    /// Panics when the slice length does not equal the shape's element
    /// count.
    pub fn from_shape_slice<T: Element>(shape: &[usize], values: &[T]) -> Self {
        let count: usize = shape.iter().product();
        assert_eq!(
            count,
            values.len(),
            "shape {:?} holds {} elements, slice has {}",
            shape,
            count,
            values.len()
        );
        let dtype = DataType::fixed_dims(shape, DataType::scalar(T::SCALAR));
        let meta = dtype.default_metadata();
        // The slice already exists in memory, so the byte size is within
        // the supported allocation range.
        let block = MemoryBlock::allocate(values.len() * size_of::<T>())
            .expect("slice-sized allocation");
        {
            let mut bytes = block.bytes_mut();
            for (i, v) in values.iter().enumerate() {
                write_scalar(&mut bytes[i * size_of::<T>()..], *v);
            }
        }
        Array {
            dtype,
            meta,
            block,
            offset: 0,
        }
    }

    /// Zero-dimensional array holding one scalar.
    pub fn scalar<T: Element>(value: T) -> Self {
        let block = MemoryBlock::allocate(size_of::<T>()).expect("scalar-sized allocation");
        write_scalar(&mut block.bytes_mut(), value);
        Array {
            dtype: DataType::scalar(T::SCALAR),
            meta: ArrayMeta::scalar(),
            block,
            offset: 0,
        }
    }

    /// Freshly allocated, zero-filled, contiguous array of `dtype`.
    pub fn zeros(dtype: &DataType) -> Result<Self, DynarrError> {
        let block = MemoryBlock::allocate(dtype.data_size())?;
        Ok(Array {
            dtype: dtype.acquire(),
            meta: dtype.default_metadata(),
            block,
            offset: 0,
        })
    }

    /// Wraps existing storage with an explicit type, layout, and offset.
    pub fn from_parts(dtype: DataType, meta: ArrayMeta, block: MemoryBlock, offset: usize) -> Self {
        Array {
            dtype,
            meta,
            block,
            offset,
        }
    }

    #[inline]
    pub fn dtype(&self) -> &DataType {
        &self.dtype
    }

    #[inline]
    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    #[inline]
    pub fn block(&self) -> &MemoryBlock {
        &self.block
    }

    /// Byte offset of the first element within the block.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Axis sizes, outermost first.
    #[inline]
    pub fn shape(&self) -> Vec<usize> {
        self.meta.shape()
    }

    /// Number of iterable dimensions.
    #[inline]
    pub fn depth(&self) -> usize {
        self.meta.depth()
    }

    /// The element type below all dimensions.
    #[inline]
    pub fn element_type(&self) -> DataType {
        self.dtype.leaf()
    }

    /// Reads one element by full index.
    ///
    /// # Panics
    /// Panics when `T` does not match the element type or an index is out
    /// of range for its axis.
    pub fn get<T: Element>(&self, indices: &[usize]) -> Result<T, DynarrError> {
        if indices.len() != self.meta.depth() {
            return Err(DynarrError::TooManyIndices {
                provided: indices.len(),
                depth: self.meta.depth(),
            });
        }
        assert_eq!(
            self.dtype.scalar_type(),
            Some(T::SCALAR),
            "element type mismatch: array holds {}",
            self.element_type()
        );
        let mut off = self.offset as isize;
        for (idx, dim) in indices.iter().zip(self.meta.dims.iter()) {
            assert!(
                *idx < dim.size,
                "index {} out of range for axis of size {}",
                idx,
                dim.size
            );
            off += *idx as isize * dim.stride;
        }
        let bytes = self.block.bytes();
        Ok(read_scalar::<T>(&bytes[off as usize..]))
    }

    /// Collects every element in row-major order, following strides.
    ///
    /// # Panics
    /// Panics when `T` does not match the element type.
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        assert_eq!(
            self.dtype.scalar_type(),
            Some(T::SCALAR),
            "element type mismatch: array holds {}",
            self.element_type()
        );
        let shape = self.meta.shape();
        let bs = BroadcastShape {
            axis_perm: (0..shape.len()).collect(),
            shape,
        };
        let cursor = StridedCursor::new(self.meta.dims.iter().map(|d| d.stride).collect());
        let mut iter = IterDriver::new(&bs, vec![(Box::new(cursor), self.offset as isize)]);
        let bytes = self.block.bytes();
        let mut out = Vec::with_capacity(iter.itersize());
        if !iter.empty() {
            loop {
                out.push(read_scalar::<T>(&bytes[iter.offset(0) as usize..]));
                if !iter.next() {
                    break;
                }
            }
        }
        out
    }
}
