use crate::errors::Result;
use crate::models::table::RawTable;
use async_trait::async_trait;

/// 按名称读取工作表的外部表格数据源
#[async_trait]
pub trait SheetSource {
    /// 数据源标识，同一份数据返回相同的值；用作缓存键
    fn source_id(&self) -> String;

    /// 读取一个具名工作表，第一行为表头
    /// 工作表不存在时返回 `TableNotFound`
    async fn read(&self, worksheet: &str) -> Result<RawTable>;
}
