use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a001_platform_connection::aggregate::PlatformConnection;
use contracts::enums::PlatformType;
use serde::Deserialize;

use super::{FetchedBatch, OrderFetchQuery, PlatformService, PlatformServiceFactory};

const PROD_BASE_URL: &str = "https://oms-external.hepsiburada.com";
const SANDBOX_BASE_URL: &str = "https://oms-external-sit.hepsiburada.com";

/// HTTP-клиент для Hepsiburada OMS API
pub struct HepsiburadaService {
    client: reqwest::Client,
    base_url: String,
    merchant_id: String,
    api_key: String,
    api_secret: String,
}

/// Страница заказов OMS
#[derive(Debug, Deserialize)]
struct HepsiburadaOrdersPage {
    #[serde(default)]
    items: Vec<serde_json::Value>,
    #[serde(rename = "totalCount", default)]
    total_count: i64,
}

impl HepsiburadaService {
    pub fn new(connection: &PlatformConnection) -> Result<Self> {
        let merchant_id = connection
            .merchant_id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Hepsiburada connection requires merchant_id"))?;
        let api_secret = connection
            .api_secret
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Hepsiburada connection requires api_secret"))?;

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
            merchant_id,
            api_key: connection.api_key.clone(),
            api_secret,
        })
    }
}

#[async_trait]
impl PlatformService for HepsiburadaService {
    fn platform_type(&self) -> PlatformType {
        PlatformType::Hepsiburada
    }

    async fn connect(&self) -> Result<()> {
        let url = format!(
            "{}/orders/merchantid/{}?offset=0&limit=1",
            self.base_url, self.merchant_id
        );
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header("User-Agent", &self.merchant_id)
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("Hepsiburada auth check failed: HTTP {}", response.status());
        }
        Ok(())
    }

    async fn fetch_orders(&self, query: &OrderFetchQuery) -> Result<FetchedBatch> {
        let url = format!("{}/orders/merchantid/{}", self.base_url, self.merchant_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .header("User-Agent", &self.merchant_id)
            .query(&[
                ("begindate", query.start_date.to_rfc3339()),
                ("enddate", query.end_date.to_rfc3339()),
                ("offset", "0".to_string()),
                ("limit", query.size.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Hepsiburada orders request failed: HTTP {} {}",
                status,
                body
            );
        }

        let page: HepsiburadaOrdersPage = response.json().await?;
        tracing::debug!(
            "Hepsiburada page fetched: {} of {} orders",
            page.items.len(),
            page.total_count
        );

        Ok(FetchedBatch {
            orders: page.items,
            message: Some(format!("totalCount={}", page.total_count)),
        })
    }
}

/// Фабрика Hepsiburada-сервисов
pub struct HepsiburadaServiceFactory;

impl PlatformServiceFactory for HepsiburadaServiceFactory {
    fn create(&self, connection: &PlatformConnection) -> Result<Box<dyn PlatformService>> {
        Ok(Box::new(HepsiburadaService::new(connection)?))
    }
}
