use rand::Rng;
use serde::Serialize;

// ============================================================================
// Location Value Object
// ============================================================================
//
// A point on the bounded delivery grid. Both coordinates are inclusive in
// [MIN_COORDINATE, MAX_COORDINATE]; a Location outside that square cannot be
// constructed. Equality is structural.
//
// ============================================================================

pub const MIN_COORDINATE: i32 = 1;
pub const MAX_COORDINATE: i32 = 10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Location ({x}, {y}) is outside the grid [{min}, {max}]", min = MIN_COORDINATE, max = MAX_COORDINATE)]
    OutOfRange { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Result<Self, LocationError> {
        let range = MIN_COORDINATE..=MAX_COORDINATE;
        if !range.contains(&x) || !range.contains(&y) {
            return Err(LocationError::OutOfRange { x, y });
        }
        Ok(Self { x, y })
    }

    /// Uniformly random point on the grid.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self {
            x: rng.random_range(MIN_COORDINATE..=MAX_COORDINATE),
            y: rng.random_range(MIN_COORDINATE..=MAX_COORDINATE),
        }
    }

    pub fn min() -> Self {
        Self { x: MIN_COORDINATE, y: MIN_COORDINATE }
    }

    pub fn max() -> Self {
        Self { x: MAX_COORDINATE, y: MAX_COORDINATE }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Manhattan distance.
    pub fn distance_to(&self, other: &Location) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_point_inside_grid_round_trips() {
        for x in MIN_COORDINATE..=MAX_COORDINATE {
            for y in MIN_COORDINATE..=MAX_COORDINATE {
                let location = Location::new(x, y).unwrap();
                assert_eq!(location.x(), x);
                assert_eq!(location.y(), y);
            }
        }
    }

    #[test]
    fn test_points_outside_grid_are_rejected() {
        let outside = [(0, 5), (5, 0), (11, 5), (5, 11), (0, 0), (11, 11), (-3, 4), (4, i32::MAX)];

        for (x, y) in outside {
            let result = Location::new(x, y);
            assert_eq!(result, Err(LocationError::OutOfRange { x, y }), "({x}, {y}) should fail");
        }
    }

    #[test]
    fn test_distance_is_manhattan() {
        let a = Location::new(2, 6).unwrap();
        let b = Location::new(4, 9).unwrap();

        assert_eq!(a.distance_to(&b), 5);
        assert_eq!(b.distance_to(&a), 5);
        assert_eq!(a.distance_to(&a), 0);
        assert_eq!(Location::min().distance_to(&Location::max()), 18);
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(Location::new(3, 7).unwrap(), Location::new(3, 7).unwrap());
        assert_ne!(Location::new(3, 7).unwrap(), Location::new(7, 3).unwrap());
    }

    #[test]
    fn test_random_location_stays_on_grid() {
        for _ in 0..200 {
            let location = Location::random();
            assert!(Location::new(location.x(), location.y()).is_ok());
        }
    }
}
