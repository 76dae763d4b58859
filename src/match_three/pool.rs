use crate::match_three::detector::MatchGroup;
use crate::match_three::sets::PosSet;

/// Scratch-container pools owned by one engine. Each simulation thread owns
/// its engines and therefore its pools; there is no cross-thread sharing.
/// `acquire` hands out a reset container, `release` returns it; a released
/// container must not be touched by the caller afterwards.
#[derive(Debug, Default)]
pub struct Pools {
    pos_sets: Vec<PosSet>,
    pos_lists: Vec<Vec<crate::match_three::coords::Pos>>,
    group_lists: Vec<Vec<MatchGroup>>,
    outstanding: usize,
}

impl Pools {
    pub fn new() -> Pools {
        Pools::default()
    }

    /// Containers currently held by callers. Zero between engine operations.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn acquire_set(&mut self) -> PosSet {
        self.outstanding += 1;
        self.pos_sets.pop().unwrap_or_default()
    }

    pub fn release_set(&mut self, mut set: PosSet) {
        self.checked_return();
        set.clear();
        self.pos_sets.push(set);
    }

    pub fn acquire_positions(&mut self) -> Vec<crate::match_three::coords::Pos> {
        self.outstanding += 1;
        self.pos_lists.pop().unwrap_or_default()
    }

    pub fn release_positions(&mut self, mut list: Vec<crate::match_three::coords::Pos>) {
        self.checked_return();
        list.clear();
        self.pos_lists.push(list);
    }

    pub fn acquire_groups(&mut self) -> Vec<MatchGroup> {
        self.outstanding += 1;
        self.group_lists.pop().unwrap_or_default()
    }

    pub fn release_groups(&mut self, mut list: Vec<MatchGroup>) {
        self.checked_return();
        list.clear();
        self.group_lists.push(list);
    }

    fn checked_return(&mut self) {
        self.outstanding = self
            .outstanding
            .checked_sub(1)
            .expect("released a container that was not acquired from this pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_three::coords::Pos;
    use crate::match_three::sets::SetOps;

    #[test]
    fn release_resets_and_reuses() {
        let mut pools = Pools::new();

        let mut set = pools.acquire_set();
        set.insert(&Pos::new(1, 1));
        pools.release_set(set);
        assert_eq!(pools.outstanding(), 0);

        let set = pools.acquire_set();
        assert!(set.is_empty());
        pools.release_set(set);
    }

    #[test]
    #[should_panic(expected = "not acquired")]
    fn foreign_release_panics() {
        let mut pools = Pools::new();
        pools.release_set(PosSet::new());
    }
}
