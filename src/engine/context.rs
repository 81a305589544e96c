use super::identity::EngineIdentity;
use super::types::{EngineSettings, SwapIntent};

/// 引擎运行所需的全部协作者，启动时显式构造后交给 `SnipeEngine`。
pub struct SnipeContext<R, L> {
    pub provider: R,
    pub lander: L,
    pub identity: EngineIdentity,
    pub intent: SwapIntent,
    pub settings: EngineSettings,
}
