//! # ScalarType Enum Module
//!
//! Leaf element types of the runtime type-descriptor system.
//!
//! Each variant describes a fixed-width machine scalar: its byte size, its
//! alignment, and which other scalars it can be assigned from without loss.
//! The lossless-assignment table here is the single source of truth for the
//! kernel builder's converting-assignment path; the overload resolver keeps
//! its own (narrower) promotion chains in [`crate::dispatch::signature`].

/// Fixed-width machine scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl ScalarType {
    /// Every scalar kind, in declaration order.
    pub const ALL: [ScalarType; 11] = [
        ScalarType::Bool,
        ScalarType::Int8,
        ScalarType::Int16,
        ScalarType::Int32,
        ScalarType::Int64,
        ScalarType::UInt8,
        ScalarType::UInt16,
        ScalarType::UInt32,
        ScalarType::UInt64,
        ScalarType::Float32,
        ScalarType::Float64,
    ];

    /// Size of one element in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::Bool | ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Int64 | ScalarType::UInt64 | ScalarType::Float64 => 8,
        }
    }

    /// Required alignment in bytes. Equal to the size for all machine
    /// scalars.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.size_bytes()
    }

    /// Canonical lowercase name, as printed in type expressions and errors.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::UInt8 => "uint8",
            ScalarType::UInt16 => "uint16",
            ScalarType::UInt32 => "uint32",
            ScalarType::UInt64 => "uint64",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
        }
    }

    /// True for the integer and floating-point kinds.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ScalarType::Bool)
    }

    /// True if every value of `src` is exactly representable in `self`.
    ///
    /// Identity is always lossless. Integer widenings stay within their
    /// signedness (plus unsigned into strictly wider signed), and integers
    /// widen into floats only when the float mantissa covers the full
    /// integer range.
    pub fn losslessly_assignable_from(&self, src: ScalarType) -> bool {
        use ScalarType::*;
        if *self == src {
            return true;
        }
        matches!(
            (src, *self),
            (Int8, Int16 | Int32 | Int64 | Float32 | Float64)
                | (Int16, Int32 | Int64 | Float32 | Float64)
                | (Int32, Int64 | Float64)
                | (UInt8, UInt16 | UInt32 | UInt64 | Int16 | Int32 | Int64 | Float32 | Float64)
                | (UInt16, UInt32 | UInt64 | Int32 | Int64 | Float32 | Float64)
                | (UInt32, UInt64 | Int64 | Float64)
                | (Float32, Float64)
        )
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarType::*;

    #[test]
    fn test_sizes_and_alignment() {
        assert_eq!(Bool.size_bytes(), 1);
        assert_eq!(Int16.size_bytes(), 2);
        assert_eq!(Float32.size_bytes(), 4);
        assert_eq!(UInt64.size_bytes(), 8);
        assert_eq!(Float64.alignment(), 8);
    }

    #[test]
    fn test_lossless_widening() {
        assert!(Int32.losslessly_assignable_from(Int16));
        assert!(Int64.losslessly_assignable_from(UInt32));
        assert!(Float64.losslessly_assignable_from(Int32));
        assert!(Float64.losslessly_assignable_from(Float32));
        assert!(Float32.losslessly_assignable_from(UInt16));
    }

    #[test]
    fn test_lossy_paths_rejected() {
        // float32 cannot hold every int32
        assert!(!Float32.losslessly_assignable_from(Int32));
        // narrowing
        assert!(!Int16.losslessly_assignable_from(Int32));
        // sign change
        assert!(!UInt32.losslessly_assignable_from(Int32));
        // float to int
        assert!(!Int64.losslessly_assignable_from(Float32));
        // bool never converts
        assert!(!Int8.losslessly_assignable_from(Bool));
        assert!(!Bool.losslessly_assignable_from(UInt8));
    }

    #[test]
    fn test_identity_is_lossless() {
        for t in super::ScalarType::ALL {
            assert!(t.losslessly_assignable_from(t));
        }
    }
}
