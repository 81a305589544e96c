use async_trait::async_trait;

use crate::api::{
    JupiterApiClient, JupiterError, QuoteOutcome, QuoteRequest, SwapRequest,
    SwapTransactionResponse,
};

/// 报价与交易构造来源。生产环境为 Jupiter HTTP API。
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<QuoteOutcome, JupiterError>;

    async fn swap_transaction(
        &self,
        request: &SwapRequest,
    ) -> Result<SwapTransactionResponse, JupiterError>;
}

#[async_trait]
impl RouteProvider for JupiterApiClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<QuoteOutcome, JupiterError> {
        JupiterApiClient::quote(self, request).await
    }

    async fn swap_transaction(
        &self,
        request: &SwapRequest,
    ) -> Result<SwapTransactionResponse, JupiterError> {
        JupiterApiClient::swap_transaction(self, request).await
    }
}
