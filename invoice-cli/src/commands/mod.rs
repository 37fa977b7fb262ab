pub mod personas;
pub mod print;
pub mod report;
pub mod total;
