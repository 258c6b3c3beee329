use std::collections::BTreeSet;

/// The free voting stations of a precinct.  Stations are handed out lowest
/// number first, which keeps runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct StationPool {
    free: BTreeSet<usize>,
}

impl StationPool {
    /// A pool with stations `0..stations_count`, all free.
    pub fn new(stations_count: usize) -> Self {
        Self {
            free: (0..stations_count).collect(),
        }
    }

    pub fn acquire(&mut self) -> Option<usize> {
        let station = *self.free.iter().next()?;
        self.free.remove(&station);
        Some(station)
    }

    pub fn release(&mut self, station: usize) {
        self.free.insert(station);
    }

    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}
