use std::borrow::Cow;

use tracing::Level;

use super::types::{LatencyGuard, LatencyMetadata};

pub fn guard(operation: impl Into<Cow<'static, str>>) -> LatencyGuard {
    LatencyGuard::new(operation, Level::DEBUG, LatencyMetadata::default())
}

pub fn guard_with_level(
    operation: impl Into<Cow<'static, str>>,
    level: Level,
    metadata: LatencyMetadata,
) -> LatencyGuard {
    LatencyGuard::new(operation, level, metadata)
}
