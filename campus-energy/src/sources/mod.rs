pub mod building_csv_file;

pub use building_csv_file::{building_name, BuildingCsvFileSource};
