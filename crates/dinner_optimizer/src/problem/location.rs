use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    point: geo::Point,
}

impl Location {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn is_finite(&self) -> bool {
        self.lat().is_finite() && self.lon().is_finite()
    }
}

impl From<geo::Point> for Location {
    fn from(point: geo::Point) -> Self {
        Self { point }
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat(), self.lon())
    }
}
