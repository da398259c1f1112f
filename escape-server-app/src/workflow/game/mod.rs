use crate::domain::{game::Game, review::Review};

pub mod create;
pub mod delete;
pub mod list;
pub mod update;

#[derive(Clone, Debug)]
pub struct GameView {
    pub game: Game,
    pub review: Option<Review>,
}
