pub mod history;
pub mod table;
pub mod ticker;
