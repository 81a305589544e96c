use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

use crate::api::serde_helpers::{decimal_from_string, field_as_string};

/// 报价服务返回的“暂不可交易”错误码。
pub const TOKEN_NOT_TRADABLE: &str = "TOKEN_NOT_TRADABLE";
pub const COULD_NOT_FIND_ANY_ROUTE: &str = "COULD_NOT_FIND_ANY_ROUTE";

/// `/quote` 请求，使用查询字符串传参。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount: u64,
    pub slippage_bps: u16,
}

impl QuoteRequest {
    pub fn new(input_mint: Pubkey, output_mint: Pubkey, amount: u64, slippage_bps: u16) -> Self {
        Self {
            input_mint,
            output_mint,
            amount,
            slippage_bps,
        }
    }

    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("inputMint", self.input_mint.to_string()),
            ("outputMint", self.output_mint.to_string()),
            ("amount", self.amount.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
        ]
    }
}

/// `/quote` 响应中关心的字段，其余字段保留在 `QuoteResponse::raw` 中原样回传。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponsePayload {
    #[serde(with = "field_as_string")]
    pub input_mint: Pubkey,
    #[serde(with = "field_as_string")]
    pub output_mint: Pubkey,
    #[serde(with = "field_as_string")]
    pub in_amount: u64,
    #[serde(with = "field_as_string")]
    pub out_amount: u64,
    #[serde(with = "field_as_string")]
    pub other_amount_threshold: u64,
    pub slippage_bps: u16,
    #[serde(with = "decimal_from_string", default)]
    pub price_impact_pct: Decimal,
    #[serde(default)]
    pub context_slot: Option<u64>,
    #[serde(default)]
    pub route_plan: Vec<Value>,
}

/// 可路由的报价。
#[derive(Clone, Debug)]
pub struct QuoteResponse {
    pub raw: Value,
    data: QuoteResponsePayload,
}

impl QuoteResponse {
    pub fn try_from_value(value: Value) -> Result<Self, serde_json::Error> {
        let data = QuoteResponsePayload::deserialize(&value)?;
        Ok(Self { raw: value, data })
    }

    pub fn payload(&self) -> &QuoteResponsePayload {
        &self.data
    }

    pub fn hops(&self) -> usize {
        self.data.route_plan.len()
    }
}

/// 报价服务明确拒绝（当前无路由）时携带的信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRejection {
    pub error_code: Option<String>,
    pub message: Option<String>,
}

impl QuoteRejection {
    pub fn describe(&self) -> String {
        match (&self.error_code, &self.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "unknown".to_string(),
        }
    }
}

/// 一次报价的结果：要么可路由，要么暂无路由。
#[derive(Debug, Clone)]
pub enum QuoteOutcome {
    Routable(QuoteResponse),
    NoRoute(QuoteRejection),
}

/// 识别报价错误对象：带 `error` 字段，或 `errorCode` 为两个已知“不可交易”错误码之一。
pub fn detect_rejection(value: &Value) -> Option<QuoteRejection> {
    let object = value.as_object()?;
    let message = object
        .get("error")
        .filter(|v| !v.is_null())
        .map(|v| match v {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        });
    let error_code = object
        .get("errorCode")
        .and_then(Value::as_str)
        .map(str::to_string);
    let known_code = matches!(
        error_code.as_deref(),
        Some(TOKEN_NOT_TRADABLE) | Some(COULD_NOT_FIND_ANY_ROUTE)
    );

    if message.is_some() || known_code {
        Some(QuoteRejection {
            error_code,
            message,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SOL: &str = "So11111111111111111111111111111111111111112";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn routable_payload() -> Value {
        json!({
            "inputMint": SOL,
            "inAmount": "500000000",
            "outputMint": USDC,
            "outAmount": "81234567",
            "otherAmountThreshold": "60925925",
            "swapMode": "ExactIn",
            "slippageBps": 2500,
            "platformFee": null,
            "priceImpactPct": "0.0012",
            "routePlan": [
                {
                    "swapInfo": {
                        "ammKey": "HcoJqG325TTifs6jyWvRJ9ET4pDu12Xrt2EQKZGFmuKX",
                        "label": "Whirlpool",
                        "inputMint": SOL,
                        "outputMint": USDC,
                        "inAmount": "500000000",
                        "outAmount": "81234567",
                        "feeAmount": "40000",
                        "feeMint": SOL
                    },
                    "percent": 100
                }
            ],
            "contextSlot": 301234567,
            "timeTaken": 0.0031
        })
    }

    #[test]
    fn query_params_cover_intent() {
        let request = QuoteRequest::new(
            SOL.parse().unwrap(),
            USDC.parse().unwrap(),
            500_000_000,
            2500,
        );
        let params = request.to_query_params();
        assert_eq!(
            params,
            vec![
                ("inputMint", SOL.to_string()),
                ("outputMint", USDC.to_string()),
                ("amount", "500000000".to_string()),
                ("slippageBps", "2500".to_string()),
            ]
        );
    }

    #[test]
    fn parses_routable_quote_and_keeps_raw() {
        let value = routable_payload();
        assert!(detect_rejection(&value).is_none());

        let quote = QuoteResponse::try_from_value(value.clone()).expect("parse quote");
        assert_eq!(quote.payload().in_amount, 500_000_000);
        assert_eq!(quote.payload().out_amount, 81_234_567);
        assert_eq!(quote.payload().slippage_bps, 2500);
        assert_eq!(quote.payload().price_impact_pct, "0.0012".parse().unwrap());
        assert_eq!(quote.payload().context_slot, Some(301_234_567));
        assert_eq!(quote.hops(), 1);
        assert_eq!(quote.raw, value);
    }

    #[test]
    fn detects_no_route_error_code() {
        let value = json!({
            "error": "Could not find any route",
            "errorCode": "COULD_NOT_FIND_ANY_ROUTE"
        });
        let rejection = detect_rejection(&value).expect("rejection");
        assert_eq!(rejection.error_code.as_deref(), Some(COULD_NOT_FIND_ANY_ROUTE));
        assert_eq!(
            rejection.describe(),
            "COULD_NOT_FIND_ANY_ROUTE: Could not find any route"
        );
    }

    #[test]
    fn detects_error_code_without_message() {
        let value = json!({ "errorCode": "TOKEN_NOT_TRADABLE" });
        let rejection = detect_rejection(&value).expect("rejection");
        assert_eq!(rejection.message, None);
        assert_eq!(rejection.describe(), "TOKEN_NOT_TRADABLE");
    }

    #[test]
    fn any_error_field_counts_as_rejection() {
        let value = json!({ "error": "The token is not tradable" });
        assert!(detect_rejection(&value).is_some());

        let value = json!({ "error": { "detail": "bad mint" } });
        assert!(detect_rejection(&value).is_some());
    }

    #[test]
    fn unknown_error_code_without_message_is_not_rejection() {
        let value = json!({ "errorCode": "SOMETHING_ELSE", "error": null });
        assert!(detect_rejection(&value).is_none());
        assert!(detect_rejection(&json!([])).is_none());
    }
}
