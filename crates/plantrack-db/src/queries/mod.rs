pub mod plans;
pub mod tasks;
pub mod users;
