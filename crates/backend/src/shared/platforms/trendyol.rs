use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a001_platform_connection::aggregate::PlatformConnection;
use contracts::enums::PlatformType;
use serde::Deserialize;

use super::{FetchedBatch, OrderFetchQuery, PlatformService, PlatformServiceFactory};

const PROD_BASE_URL: &str = "https://api.trendyol.com/sapigw";
const SANDBOX_BASE_URL: &str = "https://stageapi.trendyol.com/stagesapigw";

/// HTTP-клиент для Trendyol Supplier API
pub struct TrendyolService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    supplier_id: String,
}

/// Ответ /suppliers/{id}/orders: страница заказов
#[derive(Debug, Deserialize)]
struct TrendyolOrdersPage {
    #[serde(default)]
    content: Vec<serde_json::Value>,
    #[serde(rename = "totalElements", default)]
    total_elements: i64,
}

impl TrendyolService {
    pub fn new(connection: &PlatformConnection) -> Result<Self> {
        let supplier_id = connection
            .supplier_id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Trendyol connection requires supplier_id"))?;
        let api_secret = connection
            .api_secret
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Trendyol connection requires api_secret"))?;

        let base_url = if connection.test_mode {
            SANDBOX_BASE_URL
        } else {
            PROD_BASE_URL
        };

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.to_string(),
            api_key: connection.api_key.clone(),
            api_secret,
            supplier_id,
        })
    }
}

#[async_trait]
impl PlatformService for TrendyolService {
    fn platform_type(&self) -> PlatformType {
        PlatformType::Trendyol
    }

    async fn connect(&self) -> Result<()> {
        // Дешевый запрос для проверки учетных данных
        let url = format!(
            "{}/suppliers/{}/addresses",
            self.base_url, self.supplier_id
        );
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("Trendyol auth check failed: HTTP {}", response.status());
        }
        Ok(())
    }

    async fn fetch_orders(&self, query: &OrderFetchQuery) -> Result<FetchedBatch> {
        let url = format!("{}/suppliers/{}/orders", self.base_url, self.supplier_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&[
                ("startDate", query.start_date.timestamp_millis().to_string()),
                ("endDate", query.end_date.timestamp_millis().to_string()),
                ("page", "0".to_string()),
                ("size", query.size.to_string()),
                ("orderByField", "PackageLastModifiedDate".to_string()),
                ("orderByDirection", "DESC".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Trendyol orders request failed: HTTP {} {}", status, body);
        }

        let page: TrendyolOrdersPage = response.json().await?;
        tracing::debug!(
            "Trendyol page fetched: {} of {} orders",
            page.content.len(),
            page.total_elements
        );

        Ok(FetchedBatch {
            orders: page.content,
            message: Some(format!("totalElements={}", page.total_elements)),
        })
    }

    async fn close(&self) -> Result<()> {
        tracing::debug!("Closing Trendyol client for supplier {}", self.supplier_id);
        Ok(())
    }
}

/// Фабрика Trendyol-сервисов
pub struct TrendyolServiceFactory;

impl PlatformServiceFactory for TrendyolServiceFactory {
    fn create(&self, connection: &PlatformConnection) -> Result<Box<dyn PlatformService>> {
        Ok(Box::new(TrendyolService::new(connection)?))
    }
}
