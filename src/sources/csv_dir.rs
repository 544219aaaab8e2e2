use crate::errors::{DashboardError, Result};
use crate::models::table::{Cell, RawTable};
use crate::sources::base::SheetSource;
use async_trait::async_trait;
use log::info;
use std::io::Read;
use std::path::PathBuf;

/// 一个目录，每个工作表对应一个 `<worksheet>.csv` 文件
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// 解析带表头的 CSV，所有单元格按文本读入
pub(crate) fn parse_csv<R: Read>(name: &str, reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable::new(name, columns, rows))
}

#[async_trait]
impl SheetSource for CsvDirSource {
    fn source_id(&self) -> String {
        format!("csv:{}", self.dir.display())
    }

    async fn read(&self, worksheet: &str) -> Result<RawTable> {
        let path = self.dir.join(format!("{}.csv", worksheet));
        if !path.exists() {
            return Err(DashboardError::TableNotFound {
                worksheet: worksheet.to_string(),
            });
        }

        info!("Reading worksheet {} from {}", worksheet, path.display());
        let file = std::fs::File::open(&path)?;
        parse_csv(worksheet, file)
    }
}
