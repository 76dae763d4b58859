
use crate::match_three::coords::Pos;
use crate::match_three::sets::SetOps;

/// An ordered set of board positions, backed by a sorted vector. Iteration
/// order is row-major, which keeps every consumer of a set (event emission,
/// origin draws, wave resolution) deterministic. Boards are dynamically
/// sized, so a sorted vector beats a fixed-width bitset here; clearing keeps
/// the allocation, which is what the pools rely on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PosSet {
    items: Vec<Pos>,
}

impl PosSet {
    pub fn new() -> PosSet {
        PosSet { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> PosSet {
        PosSet { items: Vec::with_capacity(capacity) }
    }

    /// Empties the set without releasing its allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The smallest element, if any.
    pub fn first(&self) -> Option<Pos> {
        self.items.first().copied()
    }

    /// The element at the given rank in canonical order.
    pub fn nth(&self, index: usize) -> Option<Pos> {
        self.items.get(index).copied()
    }

    /// Read-only view of the backing slice, in canonical order.
    pub fn as_slice(&self) -> &[Pos] {
        &self.items
    }

    /// Whether any element of other is also in self.
    pub fn intersects(&self, other: &PosSet) -> bool {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.items.iter().any(|p| large.contains(p))
    }
}

impl SetOps<&Pos, Pos> for PosSet {
    fn contains(&self, value: &Pos) -> bool {
        self.items.binary_search(value).is_ok()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn iter(&self) -> impl Iterator<Item = Pos> {
        self.items.iter().copied()
    }

    fn insert(&mut self, value: &Pos) -> &mut Self {
        if let Err(slot) = self.items.binary_search(value) {
            self.items.insert(slot, *value);
        }
        self
    }

    fn remove(&mut self, value: &Pos) -> &mut Self {
        if let Ok(slot) = self.items.binary_search(value) {
            self.items.remove(slot);
        }
        self
    }

    fn intersect(&self, other: &Self) -> Self {
        let mut s = self.clone();
        s.intersect_inplace(other);
        s
    }

    fn intersect_inplace(&mut self, other: &Self) -> &mut Self {
        self.items.retain(|p| other.contains(p));
        self
    }

    fn union(&self, other: &Self) -> Self {
        let mut s = self.clone();
        s.union_inplace(other);
        s
    }

    fn union_inplace(&mut self, other: &Self) -> &mut Self {
        for p in &other.items {
            self.insert(p);
        }
        self
    }

    fn difference(&self, other: &Self) -> Self {
        let mut s = self.clone();
        s.difference_inplace(other);
        s
    }

    fn difference_inplace(&mut self, other: &Self) -> &mut Self {
        self.items.retain(|p| !other.contains(p));
        self
    }
}

impl<'a> FromIterator<&'a Pos> for PosSet {
    fn from_iter<T: IntoIterator<Item = &'a Pos>>(iter: T) -> Self {
        let mut s = PosSet::new();
        iter.into_iter().for_each(|p| {
            s.insert(p);
        });
        s
    }
}

impl FromIterator<Pos> for PosSet {
    fn from_iter<T: IntoIterator<Item = Pos>>(iter: T) -> Self {
        let mut s = PosSet::new();
        iter.into_iter().for_each(|p| {
            s.insert(&p);
        });
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn iterate() {
        let elements = BTreeSet::from_iter([
            Pos::new(3, 0),
            Pos::new(0, 0),
            Pos::new(1, 4),
            Pos::new(1, 2),
        ]);

        let mut s = PosSet::new();
        elements.iter().for_each(|p| {
            s.insert(p);
        });
        let recovered = s.iter().collect::<BTreeSet<_>>();

        assert!(elements == recovered)
    }

    #[test]
    fn insert_is_idempotent() {
        let mut s = PosSet::new();
        s.insert(&Pos::new(2, 2)).insert(&Pos::new(2, 2));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn pairwise_ops() {
        let a: PosSet = [Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)].into_iter().collect();
        let b: PosSet = [Pos::new(1, 0), Pos::new(3, 0)].into_iter().collect();

        assert_eq!(a.intersect(&b).len(), 1);
        assert_eq!(a.union(&b).len(), 4);
        assert_eq!(a.difference(&b).len(), 2);
        assert!(a.intersects(&b));
        assert!(!a.difference(&b).intersects(&b));
    }
}
