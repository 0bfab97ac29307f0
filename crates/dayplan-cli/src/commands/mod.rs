pub mod add;
pub mod day;
pub mod delete;
pub mod r#do;
pub mod edit;
pub mod list;
pub mod month;
pub mod r#move;
pub mod note;
pub mod plan;
pub mod profile;
pub mod remind;
pub mod report;
pub mod reward;
pub mod suggest;
