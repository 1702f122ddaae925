//! # Multidispatch Resolver Module
//!
//! Selects one overload from a registered set by the argument types of a
//! call. Exact matches win outright; otherwise every admissible overload
//! (one whose parameters all argument types promote to) is ranked by its
//! per-argument promotion-distance vector, and the unique Pareto-optimal
//! candidate is chosen.
//!
//! Ambiguity is a registration-time error, not a call-time surprise: table
//! construction probes every argument tuple two overloads could both
//! admit, and fails with the ambiguous set before any call is made. A
//! table that constructs successfully resolves every admissible call
//! unambiguously.

use crate::dispatch::signature::{Signature, promotion_distance};
use crate::enums::error::DynarrError;
use crate::enums::scalar_type::ScalarType;

/// An overload set validated to be ambiguity-free.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    signatures: Vec<Signature>,
}

impl DispatchTable {
    /// Builds a table over `signatures`, rejecting duplicates and any pair
    /// of overloads some argument tuple cannot choose between.
    pub fn new(signatures: Vec<Signature>) -> Result<Self, DynarrError> {
        for i in 0..signatures.len() {
            for j in i + 1..signatures.len() {
                if signatures[i] == signatures[j] {
                    return Err(DynarrError::AmbiguousOverload {
                        arg_types: signatures[i].params().to_vec(),
                        candidates: vec![i, j],
                    });
                }
            }
        }
        let table = DispatchTable { signatures };
        table.validate_unambiguous()?;
        Ok(table)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    #[inline]
    pub fn signature(&self, index: usize) -> &Signature {
        &self.signatures[index]
    }

    /// Resolves `args` to the index of the winning overload.
    pub fn select(&self, args: &[ScalarType]) -> Result<usize, DynarrError> {
        // Exact match short-circuits ranking entirely; construction already
        // rejected duplicate signatures, so at most one can match.
        if let Some(idx) = self
            .signatures
            .iter()
            .position(|s| s.matches_exactly(args))
        {
            return Ok(idx);
        }

        let admissible: Vec<(usize, Vec<usize>)> = self
            .signatures
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.distances(args).map(|d| (i, d)))
            .collect();
        if admissible.is_empty() {
            return Err(DynarrError::NoMatchingOverload {
                arg_types: args.to_vec(),
            });
        }

        let front: Vec<usize> = admissible
            .iter()
            .filter(|(_, d)| {
                !admissible
                    .iter()
                    .any(|(_, other)| dominates(other, d))
            })
            .map(|&(i, _)| i)
            .collect();
        match front.as_slice() {
            [winner] => Ok(*winner),
            _ => Err(DynarrError::AmbiguousOverload {
                arg_types: args.to_vec(),
                candidates: front,
            }),
        }
    }

    /// Probes every argument tuple any two overloads both admit and fails
    /// on the first one `select` cannot decide.
    fn validate_unambiguous(&self) -> Result<(), DynarrError> {
        for i in 0..self.signatures.len() {
            for j in i + 1..self.signatures.len() {
                let (a, b) = (&self.signatures[i], &self.signatures[j]);
                if a.arity() != b.arity() {
                    continue;
                }
                // Per position, the argument types admitted by both.
                let common: Vec<Vec<ScalarType>> = a
                    .params()
                    .iter()
                    .zip(b.params().iter())
                    .map(|(&pa, &pb)| {
                        ScalarType::ALL
                            .into_iter()
                            .filter(|&t| {
                                promotion_distance(t, pa).is_some()
                                    && promotion_distance(t, pb).is_some()
                            })
                            .collect()
                    })
                    .collect();
                if common.iter().any(|c| c.is_empty()) {
                    continue;
                }
                self.probe_product(&common)?;
            }
        }
        Ok(())
    }

    /// Runs `select` over the cartesian product of per-position type sets,
    /// surfacing only ambiguity.
    fn probe_product(&self, sets: &[Vec<ScalarType>]) -> Result<(), DynarrError> {
        let mut index = vec![0usize; sets.len()];
        loop {
            let args: Vec<ScalarType> =
                index.iter().zip(sets.iter()).map(|(&k, s)| s[k]).collect();
            if let Err(err @ DynarrError::AmbiguousOverload { .. }) = self.select(&args) {
                return Err(err);
            }
            // Odometer over the per-position sets.
            let mut pos = sets.len();
            loop {
                if pos == 0 {
                    return Ok(());
                }
                pos -= 1;
                index[pos] += 1;
                if index[pos] < sets[pos].len() {
                    break;
                }
                index[pos] = 0;
            }
        }
    }
}

fn dominates(a: &[usize], b: &[usize]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x <= y) && a.iter().zip(b.iter()).any(|(x, y)| x < y)
}
