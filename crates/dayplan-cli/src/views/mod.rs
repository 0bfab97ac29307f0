pub mod calendar;
pub mod table;
pub mod timeline;
