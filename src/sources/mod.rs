pub mod base;
pub mod csv_dir;
pub mod gsheets;
pub mod memory;
pub mod xlsx;

pub use base::SheetSource;
pub use csv_dir::CsvDirSource;
pub use gsheets::GoogleSheetSource;
pub use memory::MemorySource;
pub use xlsx::XlsxSource;
