use geo::{Distance, Haversine};

use crate::travel_matrices::TravelMatrices;

/// Straight-line travel matrices at a constant speed. Useful offline and in
/// tests, never a substitute for a routed matrix.
pub fn as_the_crow_flies_matrices<P>(points: &[P], speed_kmh: f64) -> TravelMatrices
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let points: Vec<geo_types::Point> = points.iter().map(|p| p.into()).collect();
    let speed = speed_kmh / 3.6;

    let mut times = Vec::with_capacity(points.len() * points.len());
    let mut distances = Vec::with_capacity(points.len() * points.len());

    for from in &points {
        for to in &points {
            let distance = Haversine.distance(*from, *to);
            distances.push(distance);
            times.push(distance / speed);
        }
    }

    TravelMatrices {
        times,
        distances: Some(distances),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPoint(f64, f64);

    impl From<&TestPoint> for geo_types::Point {
        fn from(value: &TestPoint) -> Self {
            geo_types::Point::new(value.0, value.1)
        }
    }

    #[test]
    fn test_crow_flies_matrix_shape() {
        let points = vec![TestPoint(8.53, 52.02), TestPoint(8.54, 52.03)];
        let matrices = as_the_crow_flies_matrices(&points, 5.0);

        assert_eq!(matrices.num_locations(), Some(2));
        assert_eq!(matrices.times[0], 0.0);
        assert_eq!(matrices.times[3], 0.0);
        assert!(matrices.times[1] > 0.0);
        assert_eq!(matrices.times[1], matrices.times[2]);
    }

    #[test]
    fn test_crow_flies_speed() {
        // one degree of latitude is roughly 111 km
        let points = vec![TestPoint(0.0, 0.0), TestPoint(0.0, 1.0)];
        let matrices = as_the_crow_flies_matrices(&points, 3.6);

        let distances = matrices.distances.unwrap();
        assert!((matrices.times[1] - distances[1]).abs() < 1e-6);
        assert!((distances[1] - 111_000.0).abs() < 1_000.0);
    }
}
