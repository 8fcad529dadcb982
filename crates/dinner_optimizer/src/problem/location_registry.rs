use fxhash::FxHashMap;

use super::location::{Location, LocationIdx};

/// Hands out one [`LocationIdx`] per distinct location.
///
/// By default two locations are the same only when their coordinates are
/// exactly equal. [`LocationRegistry::with_tolerance`] merges any location whose
/// latitude and longitude are both within the tolerance (in degrees) of an
/// already registered one; the first registered location wins.
#[derive(Debug, Default, Clone)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    exact: FxHashMap<(u64, u64), LocationIdx>,
    tolerance: f64,
}

fn exact_key(location: &Location) -> (u64, u64) {
    // + 0.0 folds -0.0 into 0.0
    ((location.lat() + 0.0).to_bits(), (location.lon() + 0.0).to_bits())
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance_degrees: f64) -> Self {
        Self {
            tolerance: if tolerance_degrees.is_finite() {
                tolerance_degrees.abs()
            } else {
                0.0
            },
            ..Self::default()
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn register(&mut self, location: Location) -> LocationIdx {
        if let Some(index) = self.find(&location) {
            return index;
        }

        let index = LocationIdx::new(self.locations.len());
        self.exact.insert(exact_key(&location), index);
        self.locations.push(location);
        index
    }

    pub fn find(&self, location: &Location) -> Option<LocationIdx> {
        if let Some(&index) = self.exact.get(&exact_key(location)) {
            return Some(index);
        }

        if self.tolerance == 0.0 {
            return None;
        }

        self.locations
            .iter()
            .position(|known| {
                (known.lat() - location.lat()).abs() <= self.tolerance
                    && (known.lon() - location.lon()).abs() <= self.tolerance
            })
            .map(LocationIdx::new)
    }

    pub fn location(&self, index: LocationIdx) -> &Location {
        &self.locations[index]
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
