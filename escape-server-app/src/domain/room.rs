use crate::domain::{
    Pagination, RoomId, SortOrder,
    rating::{Dimension, RoomRatings},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub owner: String,
    pub website: String,
    pub duration: u32,
    pub is_kids: bool,
    pub is_culinary: bool,
    pub minimal_people_amount: u32,
    pub maximal_people_amount: u32,
    pub ratings: RoomRatings,
}

impl Room {
    /// The subset of a room the recommendation service indexes.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id,
            name: self.name.clone(),
            overall_rating: self.ratings.overall.rounded_average(),
            scary_rating: self.ratings.scary.rounded_average(),
            difficulty_rating: self.ratings.difficulty.rounded_average(),
            is_culinary: self.is_culinary,
            minimal_people_amount: self.minimal_people_amount,
            maximal_people_amount: self.maximal_people_amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub name: String,
    pub overall_rating: f64,
    pub scary_rating: f64,
    pub difficulty_rating: f64,
    pub is_culinary: bool,
    pub minimal_people_amount: u32,
    pub maximal_people_amount: u32,
}

/// A closed or half-open interval over a dimension's average.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingBand {
    pub min: f64,
    pub max: f64,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
}

impl RatingBand {
    pub fn contains(&self, value: f64) -> bool {
        let above = if self.min_inclusive {
            value >= self.min
        } else {
            value > self.min
        };
        let below = if self.max_inclusive {
            value <= self.max
        } else {
            value < self.max
        };
        above && below
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    Easy,
    Normal,
    Hard,
}

impl DifficultyLevel {
    pub fn band(self) -> RatingBand {
        let (min, min_inclusive) = match self {
            DifficultyLevel::Easy => (0.0, true),
            DifficultyLevel::Normal => (1.0, false),
            DifficultyLevel::Hard => (2.0, false),
        };
        RatingBand {
            min,
            max: min + 1.0,
            min_inclusive,
            max_inclusive: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScarinessLevel {
    NotScary,
    LittleScary,
    VeryScary,
}

impl ScarinessLevel {
    pub fn band(self) -> RatingBand {
        match self {
            ScarinessLevel::NotScary => RatingBand {
                min: 0.0,
                max: 4.0,
                min_inclusive: true,
                max_inclusive: false,
            },
            ScarinessLevel::LittleScary => RatingBand {
                min: 4.0,
                max: 7.0,
                min_inclusive: true,
                max_inclusive: false,
            },
            ScarinessLevel::VeryScary => RatingBand {
                min: 7.0,
                max: 10.0,
                min_inclusive: true,
                max_inclusive: true,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomSortBy {
    Name,
    Rating,
}

#[derive(Clone, Debug, Default)]
pub struct RoomQuery {
    pub difficulty: Vec<DifficultyLevel>,
    pub scariness: Vec<ScarinessLevel>,
    pub city: Option<String>,
    pub owner: Option<String>,
    pub exclude: Vec<RoomId>,
    pub sort: Option<(SortOrder, RoomSortBy)>,
    pub pagination: Pagination,
}

impl RoomQuery {
    pub fn difficulty_bands(&self) -> Vec<RatingBand> {
        self.difficulty.iter().map(|level| level.band()).collect()
    }

    pub fn scariness_bands(&self) -> Vec<RatingBand> {
        self.scariness.iter().map(|level| level.band()).collect()
    }

    /// Filters only; ordering and pagination are applied by [`RoomQuery::apply`].
    pub fn matches(&self, room: &Room) -> bool {
        let in_any = |bands: Vec<RatingBand>, dimension: Dimension| {
            bands.is_empty()
                || bands
                    .iter()
                    .any(|band| band.contains(room.ratings.dimension(dimension).average))
        };
        in_any(self.difficulty_bands(), Dimension::Difficulty)
            && in_any(self.scariness_bands(), Dimension::Scary)
            && self.city.as_ref().is_none_or(|city| &room.city == city)
            && self.owner.as_ref().is_none_or(|owner| &room.owner == owner)
            && !self.exclude.contains(&room.id)
    }

    pub fn apply(&self, rooms: impl IntoIterator<Item = Room>) -> Vec<Room> {
        let mut rooms: Vec<Room> = rooms.into_iter().filter(|r| self.matches(r)).collect();
        rooms.sort_by_key(|r| r.id);
        if let Some((order, sort_by)) = self.sort {
            rooms.sort_by(|a, b| {
                let ordering = match sort_by {
                    RoomSortBy::Name => a.name.cmp(&b.name),
                    RoomSortBy::Rating => a
                        .ratings
                        .overall
                        .average
                        .total_cmp(&b.ratings.overall.average),
                };
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }
        self.pagination.apply(rooms)
    }
}

#[cfg(test)]
pub(crate) fn test_room(id: i64, name: &str) -> Room {
    Room {
        id: RoomId(id),
        name: name.to_string(),
        description: String::new(),
        address: String::new(),
        city: "Tel Aviv".to_string(),
        owner: "Escape Co".to_string(),
        website: String::new(),
        duration: 60,
        is_kids: false,
        is_culinary: false,
        minimal_people_amount: 2,
        maximal_people_amount: 6,
        ratings: RoomRatings::default(),
    }
}
