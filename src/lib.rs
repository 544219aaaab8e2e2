// 公开导出的模块，供外部使用
pub mod config;
pub mod dataset;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod render;
pub mod server;
pub mod services;
pub mod sources;
pub mod transform;
pub mod util;
pub mod window;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use dataset::Dataset;
pub use errors::{DashboardError, Result};
pub use metrics::WindowMetrics;
pub use models::history::HistoryRecord;
pub use models::table::{Cell, RawDataset, RawTable};
pub use models::ticker::TickerRecord;
pub use services::cache::DatasetCache;
pub use services::loader::Loader;
pub use sources::SheetSource;
pub use transform::transform;
pub use window::{filter_history, Period};
