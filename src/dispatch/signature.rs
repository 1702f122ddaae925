//! # Dispatch Signature Module
//!
//! Overload signatures and the promotion-distance metric the resolver
//! ranks them with.
//!
//! Promotion for dispatch is deliberately narrower than the kernel
//! builder's lossless-assignment table: arguments promote only along
//! widening chains within their own family (signed, unsigned, float),
//! plus unsigned into strictly wider signed. Integers never promote to
//! floats for overload selection, and `bool` only ever matches exactly.
//! The distance of a promotion is the number of widening steps taken.

use std::fmt;

use crate::enums::scalar_type::ScalarType;

#[inline]
fn signed_rank(t: ScalarType) -> Option<usize> {
    match t {
        ScalarType::Int8 => Some(0),
        ScalarType::Int16 => Some(1),
        ScalarType::Int32 => Some(2),
        ScalarType::Int64 => Some(3),
        _ => None,
    }
}

#[inline]
fn unsigned_rank(t: ScalarType) -> Option<usize> {
    match t {
        ScalarType::UInt8 => Some(0),
        ScalarType::UInt16 => Some(1),
        ScalarType::UInt32 => Some(2),
        ScalarType::UInt64 => Some(3),
        _ => None,
    }
}

#[inline]
fn float_rank(t: ScalarType) -> Option<usize> {
    match t {
        ScalarType::Float32 => Some(0),
        ScalarType::Float64 => Some(1),
        _ => None,
    }
}

/// Number of widening steps from `from` to `to`, or `None` when `from`
/// does not promote to `to`. Zero means an exact match.
pub fn promotion_distance(from: ScalarType, to: ScalarType) -> Option<usize> {
    if from == to {
        return Some(0);
    }
    if let (Some(a), Some(b)) = (signed_rank(from), signed_rank(to)) {
        if b > a {
            return Some(b - a);
        }
    }
    if let (Some(a), Some(b)) = (unsigned_rank(from), unsigned_rank(to)) {
        if b > a {
            return Some(b - a);
        }
    }
    // Unsigned fits into any strictly wider signed integer.
    if let (Some(a), Some(b)) = (unsigned_rank(from), signed_rank(to)) {
        if b > a {
            return Some(b - a);
        }
    }
    if let (Some(a), Some(b)) = (float_rank(from), float_rank(to)) {
        if b > a {
            return Some(b - a);
        }
    }
    None
}

/// One overload's parameter types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<ScalarType>,
}

impl Signature {
    pub fn new(params: Vec<ScalarType>) -> Self {
        Signature { params }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn params(&self) -> &[ScalarType] {
        &self.params
    }

    /// True when every argument equals its parameter.
    #[inline]
    pub fn matches_exactly(&self, args: &[ScalarType]) -> bool {
        self.params.as_slice() == args
    }

    /// Per-argument promotion distances, or `None` when some argument does
    /// not promote to its parameter (arity mismatch included).
    pub fn distances(&self, args: &[ScalarType]) -> Option<Vec<usize>> {
        if args.len() != self.params.len() {
            return None;
        }
        args.iter()
            .zip(self.params.iter())
            .map(|(&a, &p)| promotion_distance(a, p))
            .collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            f.write_str(p.name())?;
        }
        write!(f, ")")
    }
}
