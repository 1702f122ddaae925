//! # Element Traits Module
//!
//! Bridges compile-time Rust scalars to the runtime [`ScalarType`] system,
//! so typed constructors and accessors ([`crate::Array::from_slice`],
//! [`crate::Array::get`]) can check the descriptor they touch.

use num_traits::NumAssign;

use crate::enums::scalar_type::ScalarType;

/// A Rust scalar with a runtime descriptor counterpart.
pub trait Element: Copy + PartialEq + 'static {
    /// The runtime kind describing this type's layout.
    const SCALAR: ScalarType;
}

macro_rules! impl_element {
    ($($t:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Element for $t {
                const SCALAR: ScalarType = ScalarType::$kind;
            }
        )+
    };
}

impl_element! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

/// Elements that participate in arithmetic reductions.
pub trait Numeric: Element + NumAssign {}

impl<T: Element + NumAssign> Numeric for T {}
