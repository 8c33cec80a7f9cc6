//! Lane bookkeeping for one layout pass
//!
//! Each slot is free or holds the hash expected next in that column. The
//! state lives only for the duration of a single `build_graph` call.

#[derive(Debug, Default)]
pub(super) struct Lanes<'a> {
    slots: Vec<Option<&'a str>>,
}

impl<'a> Lanes<'a> {
    /// Lane already expecting `hash`, else the first free lane, else a new one.
    /// The chosen lane is marked as expecting `hash`.
    pub(super) fn resolve(&mut self, hash: &'a str) -> usize {
        if let Some(lane) = self.position(hash) {
            return lane;
        }

        match self.slots.iter().position(Option::is_none) {
            Some(lane) => {
                self.slots[lane] = Some(hash);
                lane
            }
            None => {
                self.slots.push(Some(hash));
                self.slots.len() - 1
            }
        }
    }

    /// Resolve the lane for a commit being drawn, closing any other lane that
    /// was also waiting for it
    pub(super) fn place(&mut self, hash: &'a str) -> usize {
        let lane = self.resolve(hash);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i != lane && *slot == Some(hash) {
                *slot = None;
            }
        }
        lane
    }

    pub(super) fn expect(&mut self, lane: usize, hash: &'a str) {
        self.slots[lane] = Some(hash);
    }

    pub(super) fn release(&mut self, lane: usize) {
        self.slots[lane] = None;
    }

    /// Indices of lanes waiting for a commit
    pub(super) fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|_| i))
    }

    /// Drop free lanes from the right edge
    pub(super) fn trim(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
    }

    fn position(&self, hash: &str) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(hash))
    }

    #[cfg(test)]
    fn width(&self) -> usize {
        self.slots.len()
    }
}
