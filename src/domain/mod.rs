pub mod catalog;
pub mod opponent;
pub mod rules;
pub mod side;
