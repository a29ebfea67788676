pub mod dashboard;
pub mod rates;
pub mod search;
pub mod setup;
pub mod theme;
pub mod ui;
