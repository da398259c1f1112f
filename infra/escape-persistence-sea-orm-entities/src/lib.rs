pub mod game;
pub mod review;
pub mod room;
pub mod user;
