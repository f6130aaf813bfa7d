//! TestResultStep entity: the executed mirror of a TestStep.
//!
//! `step_id` is nullable and set NULL when the authored step generation
//! is replaced; executed history must survive step re-authoring.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_result_steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub result_id: Uuid,
    pub step_id: Option<Uuid>,
    pub order: i32,
    pub action: String,
    pub expected_result: String,
    pub status: String,
    pub comment: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_result::Entity",
        from = "Column::ResultId",
        to = "super::test_result::Column::Id",
        on_delete = "Cascade"
    )]
    Result,
    #[sea_orm(
        belongs_to = "super::test_step::Entity",
        from = "Column::StepId",
        to = "super::test_step::Column::Id",
        on_delete = "SetNull"
    )]
    Step,
    #[sea_orm(has_many = "super::test_result_step_attachment::Entity")]
    Attachments,
}

impl Related<super::test_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Result.def()
    }
}

impl Related<super::test_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Step.def()
    }
}

impl Related<super::test_result_step_attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
