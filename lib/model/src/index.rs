use crate::{TemplateTerm, TermId};
use rustc_hash::{FxHashMap, FxHashSet};

/// All terms of a template, keyed by their content-addressed id.
#[derive(Clone, Debug, Default)]
pub struct TermTable {
    terms: FxHashMap<TermId, TemplateTerm>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &TermId) -> Option<&TemplateTerm> {
        self.terms.get(id)
    }

    pub fn get_mut(&mut self, id: &TermId) -> Option<&mut TemplateTerm> {
        self.terms.get_mut(id)
    }

    pub fn contains(&self, id: &TermId) -> bool {
        self.terms.contains_key(id)
    }

    /// Inserts `term` unless a term with the same id already exists. Returns true if inserted.
    pub fn insert(&mut self, term: TemplateTerm) -> bool {
        let id = term.id();
        if self.terms.contains_key(&id) {
            return false;
        }
        self.terms.insert(id, term);
        true
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TermId, &TemplateTerm)> {
        self.terms.iter()
    }

    /// Returns the terms ordered by id.
    pub fn sorted(&self) -> Vec<&TemplateTerm> {
        let mut terms = self.terms.values().collect::<Vec<_>>();
        terms.sort_by_key(|term| term.id());
        terms
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }
}

/// The edges of a template: subject -> predicate -> objects.
///
/// Edges have set semantics, inserting an existing edge is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationIndex {
    relations: FxHashMap<TermId, FxHashMap<TermId, FxHashSet<TermId>>>,
    len: usize,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an edge. Returns true if the edge was not present before.
    pub fn insert(&mut self, subject: TermId, predicate: TermId, object: TermId) -> bool {
        let inserted = self
            .relations
            .entry(subject)
            .or_default()
            .entry(predicate)
            .or_default()
            .insert(object);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn contains(&self, subject: &TermId, predicate: &TermId, object: &TermId) -> bool {
        self.relations
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .is_some_and(|objects| objects.contains(object))
    }

    /// The objects reachable from `subject` via `predicate`.
    pub fn objects(&self, subject: &TermId, predicate: &TermId) -> impl Iterator<Item = &TermId> {
        self.relations
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .into_iter()
            .flatten()
    }

    /// Iterates over all edges in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (TermId, TermId, TermId)> + '_ {
        self.relations.iter().flat_map(|(subject, predicates)| {
            predicates.iter().flat_map(move |(predicate, objects)| {
                objects
                    .iter()
                    .map(move |object| (*subject, *predicate, *object))
            })
        })
    }

    /// Returns the edges ordered by (subject, predicate, object).
    pub fn sorted_edges(&self) -> Vec<(TermId, TermId, TermId)> {
        let mut edges = self.edges().collect::<Vec<_>>();
        edges.sort_unstable();
        edges
    }

    /// The number of distinct edges.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.relations.clear();
        self.len = 0;
    }
}
