//! Pairing of unordered initializer collections.
//!
//! Object-initializer bindings and collection-initializer `Add` calls carry no
//! meaning in their source order. Both sides are sorted by a key and then compared
//! pairwise; this is not multiset matching. Ties keep source order and are never
//! retried in another pairing, so two initializers whose keys collide only match when
//! they appear in the same relative order on both sides.

use crate::error::{Error, Result};
use crate::expr::{ElementInit, Expr, MemberBinding};
use crate::types::MemberRef;

/// Assignment bindings sorted by member name.
///
/// Fails on the first binding that is not a plain assignment.
pub fn sorted_assignments(bindings: &[MemberBinding]) -> Result<Vec<(&MemberRef, &Expr)>> {
    let mut assignments = bindings
        .iter()
        .map(|binding| match binding {
            MemberBinding::Assignment { member, value } => Ok((member, value)),
            other => Err(Error::UnsupportedBindingKind {
                kind: other.kind_name(),
                member: other.member().name().to_string(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;
    assignments.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));
    Ok(assignments)
}

/// Sort key of an initializer: the rendered text of its first argument.
pub fn initializer_key(init: &ElementInit) -> String {
    init.args.first().map(|arg| arg.to_string()).unwrap_or_default()
}

/// Initializers stably sorted by [`initializer_key`].
pub fn sorted_initializers(initializers: &[ElementInit]) -> Vec<&ElementInit> {
    let mut keyed: Vec<(String, &ElementInit)> =
        initializers.iter().map(|init| (initializer_key(init), init)).collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    keyed.into_iter().map(|(_, init)| init).collect()
}
