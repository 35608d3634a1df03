pub mod calendar;
pub mod cycles;
pub mod entries;
pub mod export;
pub mod insights;
pub mod prediction;
pub mod settings;
