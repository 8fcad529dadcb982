use jiff::SignedDuration;
use thiserror::Error;

use super::location::LocationIdx;

/// Travel time in seconds
pub type Seconds = f64;

#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("A travel time matrix with {0} entries is not square")]
    NotSquare(usize),

    #[error("Row {row} has {found} entries, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Travel time from location {from} to location {to} is invalid: {value}")]
    InvalidEntry {
        from: usize,
        to: usize,
        value: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxTravelPair {
    pub from: LocationIdx,
    pub to: LocationIdx,
    pub time: Seconds,
}

/// Square table of travel times between every ordered pair of locations.
/// To find the entry for a pair of locations, use the formula:
/// `index = from * num_locations + to`.
///
/// Queries are directional: `travel_time(a, b)` and `travel_time(b, a)` may
/// differ. The diagonal always reads as zero.
#[derive(Debug, Clone)]
pub struct TravelTimeMatrix {
    times: Vec<Seconds>,
    num_locations: usize,
    is_symmetric: bool,
    max_pair: Option<MaxTravelPair>,
}

fn is_flat_matrix_symmetric(matrix: &[f64], num_locations: usize) -> bool {
    for i in 0..num_locations {
        for j in (i + 1)..num_locations {
            if matrix[i * num_locations + j] != matrix[j * num_locations + i] {
                return false;
            }
        }
    }
    true
}

impl TravelTimeMatrix {
    pub fn new(rows: Vec<Vec<Seconds>>) -> Result<Self, MatrixError> {
        let num_locations = rows.len();

        for (row, values) in rows.iter().enumerate() {
            if values.len() != num_locations {
                return Err(MatrixError::RowLength {
                    row,
                    expected: num_locations,
                    found: values.len(),
                });
            }
        }

        Self::from_flat(rows.into_iter().flatten().collect(), num_locations)
    }

    pub fn from_flat(times: Vec<Seconds>, num_locations: usize) -> Result<Self, MatrixError> {
        if times.len() != num_locations * num_locations {
            return Err(MatrixError::NotSquare(times.len()));
        }

        for (index, &value) in times.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(MatrixError::InvalidEntry {
                    from: index / num_locations,
                    to: index % num_locations,
                    value,
                });
            }
        }

        let is_symmetric = is_flat_matrix_symmetric(&times, num_locations);
        let mut matrix = TravelTimeMatrix {
            times,
            num_locations,
            is_symmetric,
            max_pair: None,
        };
        matrix.max_pair = matrix.compute_max_pair();

        Ok(matrix)
    }

    pub fn from_travel_matrices(
        matrices: dinner_matrix_providers::travel_matrices::TravelMatrices,
    ) -> Result<Self, MatrixError> {
        let len = matrices.times.len();
        let num_locations = matrices
            .num_locations()
            .ok_or(MatrixError::NotSquare(len))?;

        Self::from_flat(matrices.times, num_locations)
    }

    /// Same travel time between every pair of distinct locations.
    pub fn from_constant(num_locations: usize, time: Seconds) -> Self {
        let mut matrix = TravelTimeMatrix {
            times: vec![time; num_locations * num_locations],
            num_locations,
            is_symmetric: true,
            max_pair: None,
        };
        matrix.max_pair = matrix.compute_max_pair();
        matrix
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Seconds {
        if from == to {
            return 0.0;
        }

        self.times[self.index(from, to)]
    }

    pub fn travel_duration(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        SignedDuration::from_secs_f64(self.travel_time(from, to))
    }

    fn compute_max_pair(&self) -> Option<MaxTravelPair> {
        let mut max_pair: Option<MaxTravelPair> = None;

        for from in 0..self.num_locations {
            for to in 0..self.num_locations {
                let (from, to) = (LocationIdx::new(from), LocationIdx::new(to));
                let time = self.travel_time(from, to);
                if max_pair.is_none_or(|max| time > max.time) {
                    max_pair = Some(MaxTravelPair { from, to, time });
                }
            }
        }

        max_pair
    }

    /// The slowest ordered pair, first in row-major order on ties.
    pub fn max_pair(&self) -> Option<MaxTravelPair> {
        self.max_pair
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

#[cfg(test)]
mod tests {
    use dinner_matrix_providers::travel_matrices::TravelMatrices;

    use super::*;

    #[test]
    fn test_directional_queries() {
        let matrix = TravelTimeMatrix::new(vec![
            vec![0.0, 60.0, 120.0],
            vec![90.0, 0.0, 30.0],
            vec![150.0, 45.0, 0.0],
        ])
        .unwrap();

        let (a, b, c) = (LocationIdx::new(0), LocationIdx::new(1), LocationIdx::new(2));

        assert_eq!(matrix.travel_time(a, b), 60.0);
        assert_eq!(matrix.travel_time(b, a), 90.0);
        assert_eq!(matrix.travel_time(c, b), 45.0);
        assert_eq!(matrix.travel_duration(a, c), SignedDuration::from_mins(2));
        assert!(!matrix.is_symmetric());
    }

    #[test]
    fn test_max_pair() {
        let matrix = TravelTimeMatrix::new(vec![
            vec![0.0, 60.0, 120.0],
            vec![90.0, 0.0, 30.0],
            vec![150.0, 45.0, 0.0],
        ])
        .unwrap();

        assert_eq!(
            matrix.max_pair(),
            Some(MaxTravelPair {
                from: LocationIdx::new(2),
                to: LocationIdx::new(0),
                time: 150.0,
            })
        );
    }

    #[test]
    fn test_diagonal_reads_as_zero() {
        let matrix = TravelTimeMatrix::from_constant(3, 600.0);

        assert_eq!(matrix.travel_time(LocationIdx::new(1), LocationIdx::new(1)), 0.0);
        assert_eq!(matrix.travel_time(LocationIdx::new(1), LocationIdx::new(2)), 600.0);
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = TravelTimeMatrix::new(vec![vec![0.0, 1.0], vec![1.0]]);

        assert_eq!(
            result.unwrap_err(),
            MatrixError::RowLength {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let negative = TravelTimeMatrix::new(vec![vec![0.0, -1.0], vec![1.0, 0.0]]);
        assert!(matches!(
            negative,
            Err(MatrixError::InvalidEntry { from: 0, to: 1, .. })
        ));

        let nan = TravelTimeMatrix::new(vec![vec![0.0, 1.0], vec![f64::NAN, 0.0]]);
        assert!(matches!(
            nan,
            Err(MatrixError::InvalidEntry { from: 1, to: 0, .. })
        ));
    }

    #[test]
    fn test_from_travel_matrices() {
        let matrices = TravelMatrices {
            times: vec![0.0, 10.0, 20.0, 0.0],
            distances: None,
        };

        let matrix = TravelTimeMatrix::from_travel_matrices(matrices).unwrap();
        assert_eq!(matrix.num_locations(), 2);
        assert_eq!(matrix.travel_time(LocationIdx::new(1), LocationIdx::new(0)), 20.0);

        let not_square = TravelMatrices {
            times: vec![0.0, 10.0, 20.0],
            distances: None,
        };
        assert_eq!(
            TravelTimeMatrix::from_travel_matrices(not_square).unwrap_err(),
            MatrixError::NotSquare(3)
        );
    }
}
