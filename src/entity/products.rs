use sea_orm::entity::prelude::*;

use crate::models::StringList;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub compare_price: Option<f64>,
    pub category_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: StringList,
    pub stock: i32,
    pub sku: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: StringList,
    pub is_active: bool,
    pub is_featured: bool,
    pub average_rating: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
