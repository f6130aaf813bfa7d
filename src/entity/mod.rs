//! SeaORM entity definitions for PostgreSQL database.

pub mod test_case;
pub mod test_plan;
pub mod test_result;
pub mod test_result_step;
pub mod test_result_step_attachment;
pub mod test_step;
pub mod test_step_attachment;
pub mod user;
