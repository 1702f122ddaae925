//! # Kernel Builder Module
//!
//! Turns a (operation, destination type, source types) request into a
//! compiled kernel tree in an arena: the type pair is walked once at build
//! time, leaf entry points are selected, and struct types recurse into one
//! child per field.
//!
//! Composite builds append the parent record before its children, so child
//! indices always exceed the parent's. A failure partway through a
//! composite rolls the arena back to its pre-build mark, destroying the
//! parent and every child built so far.

use crate::enums::call_style::CallStyle;
use crate::enums::error::DynarrError;
use crate::kernels::arena::{KernelArena, KernelHandle, KernelKind, KernelRecord};
use crate::kernels::assign::{convert_entry, copy_entry, struct_assign_entry};
use crate::kernels::compare::{equal_entry, struct_equal_entry};
use crate::kernels::reduce::sum_entry;
use crate::structs::type_descriptor::{DataType, TypeKind};

/// The operations the builder can compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelOp {
    /// Element assignment, identity or lossless-widening.
    Assign,
    /// Element equality producing one `bool` byte.
    Equal,
    /// Accumulating sum into the destination.
    Sum,
}

/// Compiles a kernel for `op` into `arena` and returns its handle.
///
/// `src_types` carries one element type per operand: one for `Assign` and
/// `Sum`, two for `Equal`. The destination type is the output element type
/// (`bool` for `Equal`). Unsupported type pairs fail here, at build time;
/// invocation never fails.
pub fn build_kernel(
    arena: &mut KernelArena,
    op: KernelOp,
    dst_type: &DataType,
    src_types: &[&DataType],
    style: CallStyle,
) -> Result<KernelHandle, DynarrError> {
    match op {
        KernelOp::Assign => build_assign(arena, dst_type, src_types[0], style),
        KernelOp::Equal => build_equal(arena, src_types[0], src_types[1], style),
        KernelOp::Sum => build_sum(arena, dst_type, src_types[0], style),
    }
}

fn unsupported(from: &DataType, to: &DataType, style: CallStyle) -> DynarrError {
    DynarrError::UnsupportedConversion {
        from: from.to_string(),
        to: to.to_string(),
        call_style: style,
    }
}

fn build_assign(
    arena: &mut KernelArena,
    dst: &DataType,
    src: &DataType,
    style: CallStyle,
) -> Result<KernelHandle, DynarrError> {
    match (dst.kind(), src.kind()) {
        (TypeKind::Scalar(d), TypeKind::Scalar(s)) => {
            if d == s {
                Ok(arena.append(KernelRecord {
                    entry: copy_entry(style),
                    kind: KernelKind::ScalarAssign {
                        width: d.size_bytes(),
                    },
                }))
            } else if let Some(entry) = convert_entry(*d, *s, style) {
                Ok(arena.append(KernelRecord {
                    entry,
                    kind: KernelKind::ScalarConvert { dst: *d, src: *s },
                }))
            } else {
                Err(unsupported(src, dst, style))
            }
        }
        (TypeKind::Struct { fields: df, .. }, TypeKind::Struct { fields: sf, .. }) => {
            if df.len() != sf.len() {
                return Err(unsupported(src, dst, style));
            }
            let mark = arena.mark();
            let parent = arena.append(KernelRecord {
                entry: struct_assign_entry(style),
                kind: KernelKind::StructAssign {
                    dst_offsets: df.iter().map(|f| f.offset).collect(),
                    src_offsets: sf.iter().map(|f| f.offset).collect(),
                    field_sizes: df.iter().map(|f| f.dtype.data_size()).collect(),
                    children: Vec::new(),
                },
            });
            let mut children = Vec::with_capacity(df.len());
            for (d_field, s_field) in df.iter().zip(sf.iter()) {
                match build_assign(arena, &d_field.dtype, &s_field.dtype, CallStyle::Single) {
                    Ok(child) => children.push(child),
                    Err(err) => {
                        arena.rollback_to(mark);
                        return Err(err);
                    }
                }
            }
            match &mut arena.record_mut(parent).kind {
                KernelKind::StructAssign { children: slot, .. } => *slot = children,
                _ => unreachable!(),
            }
            Ok(parent)
        }
        _ => Err(unsupported(src, dst, style)),
    }
}

fn build_equal(
    arena: &mut KernelArena,
    src0: &DataType,
    src1: &DataType,
    style: CallStyle,
) -> Result<KernelHandle, DynarrError> {
    match (src0.kind(), src1.kind()) {
        (TypeKind::Scalar(a), TypeKind::Scalar(b)) if a == b => {
            Ok(arena.append(KernelRecord {
                entry: equal_entry(*a, style),
                kind: KernelKind::ScalarEqual { ty: *a },
            }))
        }
        (TypeKind::Struct { fields: f0, .. }, TypeKind::Struct { fields: f1, .. })
            if f0.len() == f1.len() =>
        {
            let mark = arena.mark();
            let parent = arena.append(KernelRecord {
                entry: struct_equal_entry(style),
                kind: KernelKind::StructEqual {
                    src0_offsets: f0.iter().map(|f| f.offset).collect(),
                    src1_offsets: f1.iter().map(|f| f.offset).collect(),
                    field_sizes: f0.iter().map(|f| f.dtype.data_size()).collect(),
                    children: Vec::new(),
                },
            });
            let mut children = Vec::with_capacity(f0.len());
            for (a, b) in f0.iter().zip(f1.iter()) {
                match build_equal(arena, &a.dtype, &b.dtype, CallStyle::Single) {
                    Ok(child) => children.push(child),
                    Err(err) => {
                        arena.rollback_to(mark);
                        return Err(err);
                    }
                }
            }
            match &mut arena.record_mut(parent).kind {
                KernelKind::StructEqual { children: slot, .. } => *slot = children,
                _ => unreachable!(),
            }
            Ok(parent)
        }
        _ => Err(unsupported(src0, src1, style)),
    }
}

fn build_sum(
    arena: &mut KernelArena,
    dst: &DataType,
    src: &DataType,
    style: CallStyle,
) -> Result<KernelHandle, DynarrError> {
    match (dst.kind(), src.kind()) {
        (TypeKind::Scalar(d), TypeKind::Scalar(s)) if d == s => {
            match sum_entry(*d, style) {
                Some(entry) => Ok(arena.append(KernelRecord {
                    entry,
                    kind: KernelKind::ScalarSum { ty: *d },
                })),
                None => Err(unsupported(src, dst, style)),
            }
        }
        _ => Err(unsupported(src, dst, style)),
    }
}
