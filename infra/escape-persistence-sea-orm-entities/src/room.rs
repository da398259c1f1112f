use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub address: String,
    pub city: String,
    pub owner: String,
    pub website: String,
    pub duration: i32,
    pub is_kids: bool,
    pub is_culinary: bool,
    pub minimal_people_amount: i32,
    pub maximal_people_amount: i32,

    pub overall_rating_sum: i64,
    pub overall_rating_count: i32,
    pub overall_rating_average: f64,
    pub scary_rating_sum: i64,
    pub scary_rating_count: i32,
    pub scary_rating_average: f64,
    pub difficulty_rating_sum: i64,
    pub difficulty_rating_count: i32,
    pub difficulty_rating_average: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
