pub mod analytics;
pub mod budget_category;
pub mod pay_period;
pub mod transaction;
pub mod user;
