use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Travel durations (seconds) and optional distances (meters) between every
/// ordered pair of points, stored as flat row-major vectors.
///
/// The entry for `from -> to` lives at `from * num_locations + to`.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct TravelMatrices {
    pub times: Vec<f64>,

    // Not every provider returns distances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<f64>>,
}

impl TravelMatrices {
    pub fn from_rows(times: Vec<Vec<f64>>) -> Self {
        TravelMatrices {
            times: times.into_iter().flatten().collect(),
            distances: None,
        }
    }

    /// Side length of the square table, or `None` when the flat vector cannot
    /// form one.
    pub fn num_locations(&self) -> Option<usize> {
        let n = self.times.len().isqrt();
        (n * n == self.times.len()).then_some(n)
    }
}

impl std::hash::Hash for TravelMatrices {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for t in &self.times {
            state.write_u64(t.to_bits());
        }
        if let Some(distances) = &self.distances {
            for d in distances {
                state.write_u64(d.to_bits());
            }
        } else {
            state.write_u8(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_is_row_major() {
        let matrices = TravelMatrices::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]);

        assert_eq!(matrices.times, vec![0.0, 1.0, 2.0, 0.0]);
        assert_eq!(matrices.num_locations(), Some(2));
    }

    #[test]
    fn test_num_locations_rejects_non_square() {
        let matrices = TravelMatrices {
            times: vec![0.0, 1.0, 2.0],
            distances: None,
        };

        assert_eq!(matrices.num_locations(), None);
    }
}
