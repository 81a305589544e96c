use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

use crate::api::serde_helpers::field_as_string;

use super::quote::QuoteResponse;

/// `/swap` 请求体：原样回传报价对象，由 Jupiter 构造未签名交易。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub quote_response: Value,
    #[serde(with = "field_as_string")]
    pub user_public_key: Pubkey,
    pub wrap_and_unwrap_sol: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_unit_price_micro_lamports: Option<u64>,
}

impl SwapRequest {
    pub fn from_quote(quote: &QuoteResponse, user: Pubkey) -> Self {
        Self {
            quote_response: quote.raw.clone(),
            user_public_key: user,
            wrap_and_unwrap_sol: true,
            compute_unit_price_micro_lamports: None,
        }
    }
}

/// `/swap` 响应。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransactionResponse {
    /// base64 编码的未签名 `VersionedTransaction`。
    pub swap_transaction: String,
    #[serde(default)]
    pub last_valid_block_height: Option<u64>,
    #[serde(default)]
    pub prioritization_fee_lamports: Option<u64>,
}

impl SwapTransactionResponse {
    pub fn try_from_value(value: Value) -> Result<Self, String> {
        if value.get("swapTransaction").is_none() {
            let reason = value
                .get("error")
                .map(|err| match err {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "swapTransaction missing".to_string());
            return Err(reason);
        }
        serde_json::from_value(value).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_echoes_raw_quote() {
        let raw = json!({
            "inputMint": "So11111111111111111111111111111111111111112",
            "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "inAmount": "1000",
            "outAmount": "990",
            "otherAmountThreshold": "900",
            "slippageBps": 100,
            "priceImpactPct": "0",
            "routePlan": [],
            "unknownField": { "kept": true }
        });
        let quote = QuoteResponse::try_from_value(raw.clone()).expect("quote");
        let user = Pubkey::new_unique();
        let request = SwapRequest::from_quote(&quote, user);

        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(body["quoteResponse"], raw);
        assert_eq!(body["userPublicKey"], json!(user.to_string()));
        assert_eq!(body["wrapAndUnwrapSol"], json!(true));
        assert!(body.get("computeUnitPriceMicroLamports").is_none());
    }

    #[test]
    fn parses_swap_transaction_response() {
        let value = json!({
            "swapTransaction": "AQID",
            "lastValidBlockHeight": 279_632_475u64,
            "prioritizationFeeLamports": 9_999
        });
        let response = SwapTransactionResponse::try_from_value(value).expect("parse");
        assert_eq!(response.swap_transaction, "AQID");
        assert_eq!(response.last_valid_block_height, Some(279_632_475));
        assert_eq!(response.prioritization_fee_lamports, Some(9_999));
    }

    #[test]
    fn surfaces_error_when_transaction_missing() {
        let err = SwapTransactionResponse::try_from_value(json!({ "error": "Invalid quote" }))
            .expect_err("missing transaction");
        assert_eq!(err, "Invalid quote");

        let err = SwapTransactionResponse::try_from_value(json!({})).expect_err("empty");
        assert_eq!(err, "swapTransaction missing");
    }
}
