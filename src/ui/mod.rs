pub mod explorer;
pub mod insights;
pub mod panels;
pub mod plot;
pub mod table;
pub mod tourism;
