//! The in-memory object table.
//!
//! Objects are stored in a flat vector and refer to each other by index.
//! Edges point from an object to its parents (for a commit) or to the
//! object it tags (for a tag); the reverse direction is kept as a children
//! list so that both can be reported without a second pass.

use std::collections::HashMap;

use crate::naming::Name;
use crate::object::{ObjectId, ObjectKind};

/// One object of the repository as seen by `git-find`.
#[derive(Debug, Clone)]
pub struct GitObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Names assigned by propagation, at most one per name source, sorted
    /// by source.
    pub names: Vec<Name>,
    /// Parent indices in parent order (first parent first).
    pub parents: Vec<usize>,
    /// Child indices in the order the edges were discovered.
    pub children: Vec<usize>,
    /// Reported by `git fsck` as dangling.
    pub dangling: bool,
}

impl GitObject {
    fn new(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            kind,
            names: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            dangling: false,
        }
    }
}

/// Table of every object discovered during a scan.
#[derive(Debug, Default)]
pub struct ObjectTable {
    objects: Vec<GitObject>,
    index: HashMap<ObjectId, usize>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, returning its index.
    ///
    /// When the id is already present the existing index is returned and
    /// the table is left untouched.
    pub fn insert(&mut self, id: ObjectId, kind: ObjectKind) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.objects.len();
        self.index.insert(id.clone(), idx);
        self.objects.push(GitObject::new(id, kind));
        idx
    }

    /// Record that `parent` is a parent of `child`.
    ///
    /// Returns `false` when the edge already existed.
    pub fn add_edge(&mut self, child: usize, parent: usize) -> bool {
        if self.objects[child].parents.contains(&parent) {
            return false;
        }
        self.objects[child].parents.push(parent);
        self.objects[parent].children.push(child);
        true
    }

    pub fn lookup(&self, id: &ObjectId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, idx: usize) -> &GitObject {
        &self.objects[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut GitObject {
        &mut self.objects[idx]
    }

    pub fn mark_dangling(&mut self, idx: usize) {
        self.objects[idx].dangling = true;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.objects.iter().map(|o| o.parents.len()).sum()
    }

    /// Iterate `(index, object)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &GitObject)> {
        self.objects.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(c: char) -> ObjectId {
        ObjectId::parse(&c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn insert_is_idempotent() {
        let mut table = ObjectTable::new();
        let a = table.insert(oid('a'), ObjectKind::Commit);
        let again = table.insert(oid('a'), ObjectKind::Tag);
        assert_eq!(a, again);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(a).kind, ObjectKind::Commit);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut table = ObjectTable::new();
        let child = table.insert(oid('a'), ObjectKind::Commit);
        let parent = table.insert(oid('b'), ObjectKind::Commit);

        assert!(table.add_edge(child, parent));
        assert!(!table.add_edge(child, parent));

        assert_eq!(table.get(child).parents, vec![parent]);
        assert_eq!(table.get(parent).children, vec![child]);
        assert_eq!(table.edge_count(), 1);
    }

    #[test]
    fn parent_order_is_preserved() {
        let mut table = ObjectTable::new();
        let merge = table.insert(oid('f'), ObjectKind::Commit);
        let first = table.insert(oid('1'), ObjectKind::Commit);
        let second = table.insert(oid('2'), ObjectKind::Commit);
        table.add_edge(merge, first);
        table.add_edge(merge, second);
        assert_eq!(table.get(merge).parents, vec![first, second]);
    }
}
