//! # CallStyle Enum Module
//!
//! Selects the invocation convention a kernel is compiled for.
//!
//! The style is fixed at build time: a `Single` kernel's entry point
//! performs one output element per call, a `Strided` kernel's entry point
//! performs one batch of `count` elements separated by byte strides. The
//! operation layer picks the style per call-site; the compiled plan is then
//! reused for every element (or run) of the iteration.

/// Kernel invocation convention, chosen once per kernel build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// One output element per entry-point call.
    Single,
    /// One contiguous run of elements per entry-point call, with explicit
    /// destination and source byte strides.
    Strided,
}
