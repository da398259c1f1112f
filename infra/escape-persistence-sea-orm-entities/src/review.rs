use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    #[sea_orm(unique)]
    pub game_id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub overall_rating: i32,
    pub scary_rating: i32,
    pub difficulty_rating: i32,
    pub scenery: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub comment_date: chrono::NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
