use crate::domain::round_one_decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Overall,
    Scary,
    Difficulty,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Overall, Dimension::Scary, Dimension::Difficulty];

    /// Whether a review value contributes to this dimension's aggregate.
    /// Scary and difficulty treat 0 as "not rated"; overall always counts.
    pub fn is_counted(self, value: u8) -> bool {
        match self {
            Dimension::Overall => true,
            Dimension::Scary | Dimension::Difficulty => value > 0,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Overall => write!(f, "overall"),
            Dimension::Scary => write!(f, "scary"),
            Dimension::Difficulty => write!(f, "difficulty"),
        }
    }
}

/// The ratings a single review contributes, one value per dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewRatings {
    pub overall: u8,
    pub scary: u8,
    pub difficulty: u8,
}

impl ReviewRatings {
    pub fn value(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Overall => self.overall,
            Dimension::Scary => self.scary,
            Dimension::Difficulty => self.difficulty,
        }
    }
}

/// Running `(sum, count, average)` of one rating dimension of a room.
///
/// The average is always derived from `sum / count`, never adjusted
/// incrementally, and is zero whenever the count is zero.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DimensionAggregate {
    pub sum: i64,
    pub count: u32,
    pub average: f64,
}

impl DimensionAggregate {
    pub fn from_totals(sum: i64, count: u32) -> Self {
        if count == 0 {
            return Self::default();
        }
        Self {
            sum,
            count,
            average: sum as f64 / count as f64,
        }
    }

    pub fn apply(self, dimension: Dimension, value: u8) -> Self {
        if !dimension.is_counted(value) {
            return self;
        }
        Self::from_totals(self.sum + i64::from(value), self.count + 1)
    }

    pub fn retract(self, dimension: Dimension, value: u8) -> Self {
        if !dimension.is_counted(value) {
            return self;
        }
        let Some(count) = self.count.checked_sub(1) else {
            log::warn!(
                "Retracting {} rating {} from an empty aggregate, clamping at zero",
                dimension,
                value
            );
            return Self::default();
        };
        let sum = self.sum - i64::from(value);
        if count == 0 {
            if sum != 0 {
                log::warn!(
                    "{} aggregate left a sum of {} with no ratings, resetting to zero",
                    dimension,
                    sum
                );
            }
            return Self::default();
        }
        if sum < 0 {
            log::warn!(
                "{} aggregate sum went negative ({}), clamping at zero",
                dimension,
                sum
            );
        }
        Self::from_totals(sum.max(0), count)
    }

    pub fn rounded_average(&self) -> f64 {
        round_one_decimal(self.average)
    }
}

/// Denormalized rating aggregates of a room, one per dimension.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RoomRatings {
    pub overall: DimensionAggregate,
    pub scary: DimensionAggregate,
    pub difficulty: DimensionAggregate,
}

impl RoomRatings {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionAggregate {
        match dimension {
            Dimension::Overall => &self.overall,
            Dimension::Scary => &self.scary,
            Dimension::Difficulty => &self.difficulty,
        }
    }

    fn map(
        &self,
        f: impl Fn(Dimension, DimensionAggregate) -> DimensionAggregate,
    ) -> RoomRatings {
        RoomRatings {
            overall: f(Dimension::Overall, self.overall),
            scary: f(Dimension::Scary, self.scary),
            difficulty: f(Dimension::Difficulty, self.difficulty),
        }
    }

    /// Adds a newly created review. Only valid for review creation; updates
    /// go through [`crate::domain::reconcile::reconcile_room_ratings`].
    pub fn apply_review(&self, review: &ReviewRatings) -> RoomRatings {
        self.map(|dimension, aggregate| aggregate.apply(dimension, review.value(dimension)))
    }

    /// Removes a deleted review, using its last persisted values.
    pub fn retract_review(&self, review: &ReviewRatings) -> RoomRatings {
        self.map(|dimension, aggregate| aggregate.retract(dimension, review.value(dimension)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(overall: u8, scary: u8, difficulty: u8) -> ReviewRatings {
        ReviewRatings {
            overall,
            scary,
            difficulty,
        }
    }

    #[test]
    fn test_apply_counts_only_rated_dimensions() {
        let room = RoomRatings::default().apply_review(&ratings(8, 0, 2));
        assert_eq!(room.overall, DimensionAggregate::from_totals(8, 1));
        assert_eq!(room.scary, DimensionAggregate::default());
        assert_eq!(room.difficulty.count, 1);
        assert_eq!(room.difficulty.average, 2.0);
    }

    #[test]
    fn test_apply_then_retract_restores_empty_room() {
        let review = ratings(7, 4, 3);
        let room = RoomRatings::default()
            .apply_review(&review)
            .retract_review(&review);
        for dimension in Dimension::ALL {
            let aggregate = room.dimension(dimension);
            assert_eq!(aggregate.sum, 0);
            assert_eq!(aggregate.count, 0);
            assert_eq!(aggregate.average, 0.0);
        }
    }

    #[test]
    fn test_average_recomputed_from_totals() {
        let room = RoomRatings::default()
            .apply_review(&ratings(9, 7, 2))
            .apply_review(&ratings(5, 7, 0))
            .apply_review(&ratings(8, 3, 2));
        assert_eq!(room.overall.sum, 22);
        assert_eq!(room.overall.count, 3);
        assert_eq!(room.overall.rounded_average(), 7.3);
        assert_eq!(room.scary.rounded_average(), 5.7);
        assert_eq!(room.difficulty.count, 2);
        assert_eq!(room.difficulty.average, 2.0);

        let room = room.retract_review(&ratings(5, 7, 0));
        assert_eq!(room.overall.average, 8.5);
        assert_eq!(room.scary.average, 5.0);
        assert_eq!(room.difficulty.count, 2);
    }

    #[test]
    fn test_retract_from_empty_clamps_at_zero() {
        let room = RoomRatings::default().retract_review(&ratings(6, 5, 1));
        assert_eq!(room, RoomRatings::default());
    }

    #[test]
    fn test_retract_clamps_negative_sum() {
        let drifted = DimensionAggregate::from_totals(3, 2);
        let retracted = drifted.retract(Dimension::Overall, 5);
        assert_eq!(retracted.count, 1);
        assert_eq!(retracted.sum, 0);
        assert_eq!(retracted.average, 0.0);
    }

    #[test]
    fn test_zero_overall_still_counted() {
        let aggregate = DimensionAggregate::default().apply(Dimension::Overall, 0);
        assert_eq!(aggregate.count, 1);
        assert_eq!(aggregate.average, 0.0);
        let aggregate = DimensionAggregate::default().apply(Dimension::Scary, 0);
        assert_eq!(aggregate.count, 0);
    }
}
