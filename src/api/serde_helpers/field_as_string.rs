use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serializer, de};

/// 以字符串形式序列化（`Pubkey`、`u64` 等）。
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: ToString,
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse()
        .map_err(|err| de::Error::custom(format!("无法解析字段 `{raw}`: {err}")))
}
