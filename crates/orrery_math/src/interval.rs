/// A range of ray parameters, used for the `(t_min, t_max)` window of
/// intersection queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, new upper bound.
    ///
    /// Used to shrink the search window as closer hits are found.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// The unit interval [0, 1], used for color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));

        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));
    }

    #[test]
    fn test_with_max_keeps_min() {
        let shrunk = Interval::new(0.001, f32::MAX).with_max(4.0);
        assert_eq!(shrunk.min, 0.001);
        assert_eq!(shrunk.max, 4.0);
    }

    #[test]
    fn test_unit_clamp() {
        assert_eq!(Interval::UNIT.clamp(-0.2), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.4), 0.4);
        assert_eq!(Interval::UNIT.clamp(1.7), 1.0);
    }

    #[test]
    fn test_inverted_interval_surrounds_nothing() {
        let inverted = Interval::new(1.0, -1.0);
        assert!(!inverted.surrounds(0.0));
    }
}
