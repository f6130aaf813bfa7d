//! TestResult entity: one execution of a test case.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub case_id: Uuid,
    pub result: String,
    pub browser: String,
    pub os: String,
    pub tester_id: Uuid,
    /// Set once at creation; never updated afterwards.
    pub executed_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_case::Entity",
        from = "Column::CaseId",
        to = "super::test_case::Column::Id",
        on_delete = "Cascade"
    )]
    Case,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TesterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Tester,
    #[sea_orm(has_many = "super::test_result_step::Entity")]
    ResultSteps,
}

impl Related<super::test_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Case.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tester.def()
    }
}

impl Related<super::test_result_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResultSteps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
