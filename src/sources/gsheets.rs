use crate::errors::{DashboardError, Result};
use crate::models::table::RawTable;
use crate::sources::base::SheetSource;
use crate::sources::csv_dir::parse_csv;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://docs.google.com";

/// 已发布的 Google 表格，经 CSV 导出接口按工作表名读取
pub struct GoogleSheetSource {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
}

impl GoogleSheetSource {
    pub fn new(spreadsheet_id: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn export_url(&self) -> String {
        format!("{}/spreadsheets/d/{}/gviz/tq", self.base_url, self.spreadsheet_id)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    fn source_id(&self) -> String {
        format!("gsheets:{}", self.spreadsheet_id)
    }

    async fn read(&self, worksheet: &str) -> Result<RawTable> {
        info!("Reading worksheet {} from Google Sheet {}", worksheet, self.spreadsheet_id);

        let response = self
            .client
            .get(self.export_url())
            .query(&[("tqx", "out:csv"), ("sheet", worksheet)])
            .send()
            .await?;

        // 400/404 表示工作表不存在，其余失败状态按数据错误处理
        match response.status() {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                return Err(DashboardError::TableNotFound {
                    worksheet: worksheet.to_string(),
                });
            }
            s => {
                return Err(DashboardError::DataError(format!(
                    "Worksheet {} request failed: HTTP status {}",
                    worksheet, s
                )));
            }
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes for worksheet {}", body.len(), worksheet);
        parse_csv(worksheet, body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::table::Cell;
    use axum::extract::{Path, Query};
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    #[test]
    fn test_export_url() {
        let source = GoogleSheetSource::new("abc123")
            .unwrap()
            .with_base_url("http://localhost:9000/");
        assert_eq!(
            source.export_url(),
            "http://localhost:9000/spreadsheets/d/abc123/gviz/tq"
        );
        assert_eq!(source.source_id(), "gsheets:abc123");
    }

    async fn export_handler(
        Path(id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> (axum::http::StatusCode, String) {
        use axum::http::StatusCode;
        assert_eq!(id, "sheet-1");
        assert_eq!(params.get("tqx").map(String::as_str), Some("out:csv"));
        match params.get("sheet").map(String::as_str) {
            Some("ticker") => (
                StatusCode::OK,
                "ticker,symbol_name,last_price\nTCS,Tata,3500.5\n".to_string(),
            ),
            Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, "oops".to_string()),
            _ => (StatusCode::NOT_FOUND, String::new()),
        }
    }

    /// 本地起一个导出接口，返回监听地址
    async fn spawn_export_server() -> String {
        let app = Router::new().route("/spreadsheets/d/:id/gviz/tq", get(export_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_read_over_http() {
        let base_url = spawn_export_server().await;
        let source = GoogleSheetSource::new("sheet-1").unwrap().with_base_url(&base_url);

        let table = source.read("ticker").await.unwrap();
        assert_eq!(table.name, "ticker");
        assert_eq!(table.columns, vec!["ticker", "symbol_name", "last_price"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 2), &Cell::Text("3500.5".to_string()));

        let missing = source.read("INFY").await.unwrap_err();
        assert!(matches!(
            &missing,
            DashboardError::TableNotFound { worksheet } if worksheet == "INFY"
        ));
        assert!(missing.is_lookup());

        let failed = source.read("broken").await.unwrap_err();
        assert!(matches!(failed, DashboardError::DataError(_)));
        assert!(!failed.is_lookup());
    }
}
