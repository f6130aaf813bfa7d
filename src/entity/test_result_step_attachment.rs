//! TestResultStepAttachment entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_result_step_attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub result_step_id: Uuid,
    /// Storage key of the uploaded file; absent when no file was stored.
    pub file_key: Option<String>,
    pub file_name: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_result_step::Entity",
        from = "Column::ResultStepId",
        to = "super::test_result_step::Column::Id",
        on_delete = "Cascade"
    )]
    ResultStep,
}

impl Related<super::test_result_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResultStep.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
