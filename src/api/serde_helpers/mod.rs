//! Jupiter 响应里数值、公钥一律以字符串传输，这里集中放置对应的 serde 适配。

pub mod decimal_from_string;
pub mod field_as_string;
