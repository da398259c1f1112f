use crate::domain::rating::{Dimension, DimensionAggregate, ReviewRatings, RoomRatings};

/// Recomputes a room's aggregates from every live review of the room.
///
/// Each dimension is counted independently: a review only contributes to a
/// dimension it actually rated.
pub fn reconcile_room_ratings<'a>(
    reviews: impl IntoIterator<Item = &'a ReviewRatings>,
) -> RoomRatings {
    let mut totals = [(0i64, 0u32); 3];
    for review in reviews {
        for (index, dimension) in Dimension::ALL.into_iter().enumerate() {
            let value = review.value(dimension);
            if dimension.is_counted(value) {
                totals[index].0 += i64::from(value);
                totals[index].1 += 1;
            }
        }
    }
    let [overall, scary, difficulty] =
        totals.map(|(sum, count)| DimensionAggregate::from_totals(sum, count));
    RoomRatings {
        overall,
        scary,
        difficulty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reviews() -> Vec<ReviewRatings> {
        vec![
            ReviewRatings {
                overall: 9,
                scary: 7,
                difficulty: 2,
            },
            ReviewRatings {
                overall: 5,
                scary: 7,
                difficulty: 0,
            },
            ReviewRatings {
                overall: 8,
                scary: 3,
                difficulty: 2,
            },
        ]
    }

    #[test]
    fn test_reconcile_matches_incremental_application() {
        let reviews = sample_reviews();
        let incremental = reviews
            .iter()
            .fold(RoomRatings::default(), |room, review| room.apply_review(review));
        assert_eq!(reconcile_room_ratings(&reviews), incremental);
    }

    #[test]
    fn test_reconcile_counts_dimensions_independently() {
        let room = reconcile_room_ratings(&sample_reviews());
        assert_eq!(room.overall.count, 3);
        assert_eq!(room.scary.count, 3);
        assert_eq!(room.difficulty.count, 2);
        assert_eq!(room.difficulty.sum, 4);
        assert_eq!(room.overall.rounded_average(), 7.3);
        assert_eq!(room.scary.rounded_average(), 5.7);
        assert_eq!(room.difficulty.rounded_average(), 2.0);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let reviews = sample_reviews();
        assert_eq!(
            reconcile_room_ratings(&reviews),
            reconcile_room_ratings(&reviews)
        );
    }

    #[test]
    fn test_reconcile_without_reviews_is_empty() {
        assert_eq!(
            reconcile_room_ratings(std::iter::empty()),
            RoomRatings::default()
        );
    }
}
