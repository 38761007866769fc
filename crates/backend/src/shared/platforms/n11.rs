use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a001_platform_connection::aggregate::PlatformConnection;
use contracts::enums::PlatformType;
use serde::Deserialize;
use serde_json::json;

use super::{FetchedBatch, OrderFetchQuery, PlatformService, PlatformServiceFactory};

const PROD_BASE_URL: &str = "https://api.n11.com/ms";

/// HTTP-клиент для N11 Marketplace API
pub struct N11Service {
    client: reqwest::Client,
    base_url: String,
    app_key: String,
    app_secret: String,
}

/// Страница списка заказов
#[derive(Debug, Deserialize)]
struct N11OrdersPage {
    #[serde(default)]
    content: Vec<serde_json::Value>,
    #[serde(rename = "totalElements", default)]
    total_elements: i64,
}

impl N11Service {
    pub fn new(connection: &PlatformConnection) -> Result<Self> {
        let app_secret = connection
            .api_secret
            .clone()
            .ok_or_else(|| anyhow::anyhow!("N11 connection requires api_secret"))?;

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: PROD_BASE_URL.to_string(),
            app_key: connection.api_key.clone(),
            app_secret,
        })
    }
}

#[async_trait]
impl PlatformService for N11Service {
    fn platform_type(&self) -> PlatformType {
        PlatformType::N11
    }

    async fn connect(&self) -> Result<()> {
        let url = format!("{}/order/order-list", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("appKey", &self.app_key)
            .header("appSecret", &self.app_secret)
            .json(&json!({ "pagingData": { "currentPage": 0, "pageSize": 1 } }))
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("N11 auth check failed: HTTP {}", response.status());
        }
        Ok(())
    }

    async fn fetch_orders(&self, query: &OrderFetchQuery) -> Result<FetchedBatch> {
        let url = format!("{}/order/order-list", self.base_url);

        let body = json!({
            "startDate": query.start_date.format("%d/%m/%Y").to_string(),
            "endDate": query.end_date.format("%d/%m/%Y").to_string(),
            "pagingData": {
                "currentPage": 0,
                "pageSize": query.size,
            },
        });

        let response = self
            .client
            .post(&url)
            .header("appKey", &self.app_key)
            .header("appSecret", &self.app_secret)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("N11 orders request failed: HTTP {} {}", status, text);
        }

        let page: N11OrdersPage = response.json().await?;
        tracing::debug!(
            "N11 page fetched: {} of {} orders",
            page.content.len(),
            page.total_elements
        );

        Ok(FetchedBatch {
            orders: page.content,
            message: Some(format!("totalElements={}", page.total_elements)),
        })
    }
}

/// Фабрика N11-сервисов
pub struct N11ServiceFactory;

impl PlatformServiceFactory for N11ServiceFactory {
    fn create(&self, connection: &PlatformConnection) -> Result<Box<dyn PlatformService>> {
        Ok(Box::new(N11Service::new(connection)?))
    }
}
