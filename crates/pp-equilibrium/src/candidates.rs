//! Active/inactive partition of condensed product candidates.

use pp_core::SpeciesId;

/// One condensed candidate and its current mole number (per gram of propellant).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CondensedEntry {
    pub species: SpeciesId,
    pub moles: f64,
}

/// Condensed candidates split into an active prefix and an inactive suffix.
///
/// Membership changes only by swapping entries across the boundary and
/// moving the active count; entries are never copied or dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    entries: Vec<CondensedEntry>,
    active: usize,
}

impl CandidateSet {
    /// All candidates start inactive with zero moles.
    pub fn new(species: impl IntoIterator<Item = SpeciesId>) -> Self {
        Self {
            entries: species
                .into_iter()
                .map(|species| CondensedEntry { species, moles: 0.0 })
                .collect(),
            active: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &[CondensedEntry] {
        &self.entries[..self.active]
    }

    pub(crate) fn active_mut(&mut self) -> &mut [CondensedEntry] {
        &mut self.entries[..self.active]
    }

    /// Position of `species` in the active prefix.
    pub fn active_position(&self, species: SpeciesId) -> Option<usize> {
        self.active().iter().position(|e| e.species == species)
    }

    pub fn inactive(&self) -> &[CondensedEntry] {
        &self.entries[self.active..]
    }

    /// Entry at an absolute position (active positions first).
    pub fn get(&self, position: usize) -> Option<&CondensedEntry> {
        self.entries.get(position)
    }

    /// Absolute positions of the inactive suffix.
    pub fn inactive_positions(&self) -> std::ops::Range<usize> {
        self.active..self.entries.len()
    }

    /// Move the inactive entry at `position` to the end of the active prefix.
    /// It enters with zero moles.
    pub fn include(&mut self, position: usize) -> bool {
        if position < self.active || position >= self.entries.len() {
            return false;
        }
        self.entries.swap(self.active, position);
        self.entries[self.active].moles = 0.0;
        self.active += 1;
        true
    }

    /// Move the active entry at `position` to the start of the inactive suffix.
    pub fn exclude(&mut self, position: usize) -> bool {
        if position >= self.active {
            return false;
        }
        let last = self.active - 1;
        self.entries.swap(position, last);
        self.entries[last].moles = 0.0;
        self.active = last;
        true
    }

    /// Exchange an active entry with an inactive one; the incoming
    /// species takes over the outgoing species' moles.
    pub fn replace(&mut self, active_position: usize, inactive_position: usize) -> bool {
        if active_position >= self.active
            || inactive_position < self.active
            || inactive_position >= self.entries.len()
        {
            return false;
        }
        let moles = self.entries[active_position].moles;
        self.entries.swap(active_position, inactive_position);
        self.entries[active_position].moles = moles;
        self.entries[inactive_position].moles = 0.0;
        true
    }

    /// Deactivate everything and zero all moles.
    pub fn reset(&mut self) {
        for e in &mut self.entries {
            e.moles = 0.0;
        }
        self.active = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_core::Id;

    fn ids(n: u32) -> Vec<SpeciesId> {
        (0..n).map(Id::from_index).collect()
    }

    fn species(set: &CandidateSet) -> Vec<u32> {
        set.active()
            .iter()
            .chain(set.inactive())
            .map(|e| e.species.index())
            .collect()
    }

    #[test]
    fn starts_inactive() {
        let set = CandidateSet::new(ids(3));
        assert_eq!(set.active_len(), 0);
        assert_eq!(set.inactive().len(), 3);
        assert_eq!(set.inactive_positions(), 0..3);
    }

    #[test]
    fn include_swaps_to_boundary() {
        let mut set = CandidateSet::new(ids(4));
        assert!(set.include(2));
        assert_eq!(species(&set), vec![2, 1, 0, 3]);
        assert_eq!(set.active_len(), 1);

        assert!(set.include(3));
        assert_eq!(species(&set), vec![2, 3, 0, 1]);
        assert_eq!(set.active_len(), 2);

        // active entries cannot be included again
        assert!(!set.include(0));
        assert!(!set.include(9));

        assert_eq!(set.active_position(Id::from_index(3)), Some(1));
        assert_eq!(set.active_position(Id::from_index(0)), None);
    }

    #[test]
    fn exclude_swaps_with_last_active() {
        let mut set = CandidateSet::new(ids(4));
        set.include(0);
        set.include(1);
        set.include(2);
        set.active_mut()[0].moles = 0.5;
        set.active_mut()[2].moles = 0.25;

        assert!(set.exclude(0));
        assert_eq!(set.active_len(), 2);
        assert_eq!(species(&set), vec![2, 1, 0, 3]);
        assert_eq!(set.active()[0].moles, 0.25);
        assert_eq!(set.inactive()[0].moles, 0.0);
        assert!(!set.exclude(2));
    }

    #[test]
    fn replace_transfers_moles() {
        let mut set = CandidateSet::new(ids(3));
        set.include(0);
        set.active_mut()[0].moles = 0.4;

        assert!(set.replace(0, 2));
        assert_eq!(species(&set), vec![2, 1, 0]);
        assert_eq!(set.active()[0].moles, 0.4);
        assert_eq!(set.get(2).unwrap().moles, 0.0);
        assert!(!set.replace(1, 2));
    }

    #[test]
    fn reset_clears_everything() {
        let mut set = CandidateSet::new(ids(2));
        set.include(1);
        set.active_mut()[0].moles = 1.0;
        set.reset();
        assert_eq!(set.active_len(), 0);
        assert!(set.inactive().iter().all(|e| e.moles == 0.0));
    }
}
