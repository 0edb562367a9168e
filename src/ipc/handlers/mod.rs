pub mod campaigns;
pub mod channels;
pub mod config;
pub mod core;
pub mod leads;
pub mod menu;
pub mod reports;
pub mod revenue;
pub mod staff;
pub mod statistics;
pub mod students;
pub mod tables;
