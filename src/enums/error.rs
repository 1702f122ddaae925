//! # Error Module - Custom *Dynarr* Error Type
//!
//! Defines the unified error type for Dynarr.
//!
//! ## Features
//! - Covers broadcast shape incompatibility, unsupported kernel conversion
//!   paths, overload resolution failures, allocation failures, and index
//!   arity violations.
//! - Implements `Display` for readable output and `Error` for integration
//!   with standard Rust error handling.
//!
//! Every variant is fatal to the current build/iterate/dispatch call — none
//! are retried internally, no destination memory is written on failure, and
//! partially constructed resources are torn down before the error
//! propagates.

use std::error::Error;
use std::fmt;

use crate::enums::call_style::CallStyle;
use crate::enums::scalar_type::ScalarType;

/// Catch all error type for `Dynarr`
#[derive(Debug, Clone, PartialEq)]
pub enum DynarrError {
    /// Two operand shapes contribute distinct sizes greater than one on the
    /// same (right-aligned) axis. Carries both conflicting shapes.
    BroadcastIncompatibleShapes {
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },
    /// No kernel construction path exists for the given concrete runtime
    /// types and call style.
    UnsupportedConversion {
        from: String,
        to: String,
        call_style: CallStyle,
    },
    /// Two or more admissible overload candidates are mutually
    /// Pareto-incomparable for the given argument types.
    AmbiguousOverload {
        arg_types: Vec<ScalarType>,
        candidates: Vec<usize>,
    },
    /// No overload candidate admits the argument types, exactly or via
    /// promotion.
    NoMatchingOverload {
        arg_types: Vec<ScalarType>,
    },
    /// Arena or memory-block growth failed.
    AllocationFailure {
        requested: usize,
    },
    /// Index arity exceeds the iteration depth of the indexed value.
    TooManyIndices {
        provided: usize,
        depth: usize,
    },
}

fn fmt_shape(f: &mut fmt::Formatter<'_>, shape: &[usize]) -> fmt::Result {
    write!(f, "(")?;
    for (i, d) in shape.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", d)?;
    }
    if shape.len() == 1 {
        write!(f, ",")?;
    }
    write!(f, ")")
}

fn fmt_types(f: &mut fmt::Formatter<'_>, types: &[ScalarType]) -> fmt::Result {
    write!(f, "(")?;
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", t.name())?;
    }
    write!(f, ")")
}

impl fmt::Display for DynarrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynarrError::BroadcastIncompatibleShapes { lhs, rhs } => {
                write!(f, "Broadcast error: shapes ")?;
                fmt_shape(f, lhs)?;
                write!(f, " and ")?;
                fmt_shape(f, rhs)?;
                write!(f, " cannot be broadcast together.")
            }
            DynarrError::UnsupportedConversion {
                from,
                to,
                call_style,
            } => {
                write!(
                    f,
                    "Unsupported conversion: no {:?}-style kernel path from '{}' to '{}'.",
                    call_style, from, to
                )
            }
            DynarrError::AmbiguousOverload {
                arg_types,
                candidates,
            } => {
                write!(f, "Ambiguous overload: argument types ")?;
                fmt_types(f, arg_types)?;
                write!(
                    f,
                    " admit {} mutually incomparable candidates {:?}.",
                    candidates.len(),
                    candidates
                )
            }
            DynarrError::NoMatchingOverload { arg_types } => {
                write!(f, "No matching overload for argument types ")?;
                fmt_types(f, arg_types)?;
                write!(f, ".")
            }
            DynarrError::AllocationFailure { requested } => {
                write!(f, "Allocation failure: {} bytes requested.", requested)
            }
            DynarrError::TooManyIndices { provided, depth } => {
                write!(
                    f,
                    "Too many indices: {} provided, but the iteration depth is {}.",
                    provided, depth
                )
            }
        }
    }
}

impl Error for DynarrError {}
