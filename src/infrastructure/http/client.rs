use crate::application::query_builder::QueryBuilder;
use crate::domain::entities::trade::{Trade, TradeInput};
use crate::domain::error::DomainError;
use crate::domain::ports::record_store::{ListQuery, RecordStore, TradePage};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Record store living behind the trades HTTP API.
pub struct HttpTradeStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpTradeStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent("tradedesk/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Transport(format!("HTTP client error: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn trades_url(&self) -> String {
        format!("{}/api/trades", self.base_url)
    }

    fn trade_url(&self, id: &str) -> String {
        format!("{}/api/trades/{}", self.base_url, urlencoding::encode(id))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Response, DomainError> {
        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<ErrorBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_else(|_| status.to_string());
        Err(match status {
            StatusCode::NOT_FOUND => DomainError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                DomainError::Validation(message)
            }
            _ => DomainError::Transport(format!("Trades API returned {status}: {message}")),
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, DomainError> {
        resp.json()
            .await
            .map_err(|e| DomainError::Transport(format!("Malformed response: {e}")))
    }
}

#[async_trait::async_trait]
impl RecordStore for HttpTradeStore {
    async fn list(&self, query: &ListQuery) -> Result<TradePage, DomainError> {
        let params = QueryBuilder::to_params(query);
        let resp = self
            .send(self.client.get(self.trades_url()).query(&params))
            .await?;
        Self::decode(resp).await
    }

    async fn get(&self, id: &str) -> Result<Trade, DomainError> {
        let resp = self.send(self.client.get(self.trade_url(id))).await?;
        Self::decode(resp).await
    }

    async fn create(&self, input: TradeInput) -> Result<Trade, DomainError> {
        let resp = self
            .send(self.client.post(self.trades_url()).json(&input))
            .await?;
        Self::decode(resp).await
    }

    async fn update(&self, id: &str, input: TradeInput) -> Result<Trade, DomainError> {
        let resp = self
            .send(self.client.put(self.trade_url(id)).json(&input))
            .await?;
        Self::decode(resp).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.send(self.client.delete(self.trade_url(id))).await?;
        Ok(())
    }
}
