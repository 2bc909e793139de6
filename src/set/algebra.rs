//! Set algebra (union, intersection, difference)
//!
//! The operators are pure functions over optional tables, where `None` is
//! an absent key. [`SetRegistry::combine`] and [`SetRegistry::combine_store`]
//! lock the keys and feed them through the operators.

use super::registry::SetRegistry;
use crate::error::Result;
use crate::store::MemberTable;
use bytes::Bytes;

/// Multi-key set operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Union,
    Intersect,
    Difference,
}

impl SetOp {
    /// Apply the operator to tables listed in argument order
    pub fn apply(self, tables: &[Option<&MemberTable>]) -> MemberTable {
        match self {
            SetOp::Union => union(tables),
            SetOp::Intersect => intersect(tables),
            SetOp::Difference => difference(tables),
        }
    }
}

/// Members present in any table
pub fn union(tables: &[Option<&MemberTable>]) -> MemberTable {
    let largest = tables.iter().flatten().map(|t| t.len()).max().unwrap_or(0);
    let mut result = MemberTable::with_capacity(largest);
    for table in tables.iter().flatten() {
        result.extend(table.iter().cloned());
    }
    result
}

/// Members present in every table
///
/// Probes from the smallest table so the work is bounded by the smallest
/// operand rather than the first listed one.
pub fn intersect(tables: &[Option<&MemberTable>]) -> MemberTable {
    if tables.iter().any(|t| t.map_or(true, |t| t.is_empty())) {
        return MemberTable::new();
    }

    let tables: Vec<&MemberTable> = tables.iter().flatten().copied().collect();
    let Some((probe_idx, probe)) = tables.iter().enumerate().min_by_key(|(_, t)| t.len()) else {
        return MemberTable::new();
    };

    probe
        .iter()
        .filter(|member| {
            tables
                .iter()
                .enumerate()
                .all(|(i, t)| i == probe_idx || t.contains(member))
        })
        .cloned()
        .collect()
}

/// Members of the first table absent from all the others
pub fn difference(tables: &[Option<&MemberTable>]) -> MemberTable {
    let Some(Some(first)) = tables.first() else {
        return MemberTable::new();
    };

    let others = &tables[1..];
    first
        .iter()
        .filter(|member| !others.iter().flatten().any(|t| t.contains(member)))
        .cloned()
        .collect()
}

impl SetRegistry {
    /// Compute `op` over `keys` without touching the key-space
    pub fn combine(&self, op: SetOp, keys: &[Bytes]) -> Result<MemberTable> {
        let sets = self.lock(keys);
        let tables = keys
            .iter()
            .map(|k| sets.get(k))
            .collect::<Result<Vec<_>>>()?;

        Ok(op.apply(&tables))
    }

    /// Compute `op` over `keys` and store the result at `dest`
    ///
    /// The destination is overwritten whatever its type, or deleted when the
    /// result is empty. Returns the cardinality of the result.
    pub fn combine_store(&self, op: SetOp, dest: &Bytes, keys: &[Bytes]) -> Result<usize> {
        let mut locked = keys.to_vec();
        locked.push(dest.clone());
        let mut sets = self.lock(&locked);

        let result = {
            let tables = keys
                .iter()
                .map(|k| sets.get(k))
                .collect::<Result<Vec<_>>>()?;
            op.apply(&tables)
        };

        sets.replace(dest, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetError;
    use crate::store::{Keyspace, Value};
    use std::sync::Arc;

    fn table(members: &[&str]) -> MemberTable {
        members.iter().map(|m| Bytes::from(m.to_string())).collect()
    }

    fn sorted(table: &MemberTable) -> Vec<Bytes> {
        let mut members = table.snapshot();
        members.sort();
        members
    }

    fn bytes(members: &[&str]) -> Vec<Bytes> {
        members.iter().map(|m| Bytes::from(m.to_string())).collect()
    }

    #[test]
    fn test_union() {
        let (a, b) = (table(&["a", "b", "c"]), table(&["c", "d", "e"]));
        let result = union(&[Some(&a), Some(&b)]);
        assert_eq!(sorted(&result), bytes(&["a", "b", "c", "d", "e"]));
        assert!(union(&[None, None]).is_empty());
        assert_eq!(union(&[None, Some(&a)]), a);
    }

    #[test]
    fn test_intersect() {
        let (a, b) = (table(&["a", "b", "c"]), table(&["c", "d", "e"]));
        assert_eq!(sorted(&intersect(&[Some(&a), Some(&b)])), bytes(&["c"]));
        assert!(intersect(&[Some(&a), None]).is_empty());
        assert!(intersect(&[Some(&a), Some(&MemberTable::new())]).is_empty());
        assert!(intersect(&[]).is_empty());
    }

    #[test]
    fn test_intersect_probes_smallest() {
        let big: MemberTable = (0..1000).map(|i| format!("m{}", i)).collect();
        let small = table(&["m1", "m500", "zzz"]);
        let result = intersect(&[Some(&big), Some(&small), Some(&big)]);
        assert_eq!(sorted(&result), bytes(&["m1", "m500"]));
    }

    #[test]
    fn test_difference() {
        let (a, b) = (table(&["a", "b", "c"]), table(&["c", "d", "e"]));
        assert_eq!(sorted(&difference(&[Some(&a), Some(&b)])), bytes(&["a", "b"]));
        assert_eq!(difference(&[Some(&a), None]), a);
        assert!(difference(&[None, Some(&b)]).is_empty());
        let c = table(&["a"]);
        assert_eq!(sorted(&difference(&[Some(&a), Some(&b), Some(&c)])), bytes(&["b"]));
    }

    #[test]
    fn test_combine_store_empty_deletes_dest() {
        let registry = SetRegistry::new(Arc::new(Keyspace::new()));
        let (x, y, dest) = (Bytes::from("x"), Bytes::from("y"), Bytes::from("dest"));

        registry.lock_one(&x).get_or_create(&x).unwrap().add("1");
        registry.lock_one(&y).get_or_create(&y).unwrap().add("2");
        registry.lock_one(&dest).get_or_create(&dest).unwrap().add("old");

        let stored = registry.combine_store(SetOp::Intersect, &dest, &[x.clone(), y.clone()]);
        assert_eq!(stored, Ok(0));
        assert!(!registry.keyspace().keys().contains(&dest));

        let stored = registry.combine_store(SetOp::Union, &dest, &[x, y]);
        assert_eq!(stored, Ok(2));
    }

    #[test]
    fn test_combine_store_dest_among_sources() {
        let registry = SetRegistry::new(Arc::new(Keyspace::new()));
        let (a, b) = (Bytes::from("a"), Bytes::from("b"));
        registry.lock_one(&a).get_or_create(&a).unwrap().extend(["1", "2"]);
        registry.lock_one(&b).get_or_create(&b).unwrap().extend(["2", "3"]);

        assert_eq!(registry.combine_store(SetOp::Difference, &a, &[a.clone(), b.clone()]), Ok(1));
        let result = registry.combine(SetOp::Union, &[a]).unwrap();
        assert_eq!(sorted(&result), bytes(&["1"]));
    }

    #[test]
    fn test_combine_wrong_type() {
        let registry = SetRegistry::new(Arc::new(Keyspace::new()));
        let (s, set) = (Bytes::from("s"), Bytes::from("set"));
        registry.keyspace().lock_one(&s).insert(&s, Value::string("v"));
        registry.lock_one(&set).get_or_create(&set).unwrap().add("a");

        assert_eq!(registry.combine(SetOp::Union, &[set.clone(), s.clone()]), Err(SetError::WrongType));

        // The destination type does not matter for store variants
        assert_eq!(registry.combine_store(SetOp::Union, &s, &[set]), Ok(1));
    }
}
