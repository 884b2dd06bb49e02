pub mod boq;

use anyhow::Result;

use crate::domain::models::GatewayBox;

pub struct GatewayManager {}

impl GatewayManager {
    // Only the multi-endpoint backend contract is implemented. The unified
    // single-endpoint variant is unsupported.
    pub fn get() -> Result<GatewayBox> {
        return Ok(Box::<boq::BoqGateway>::default());
    }
}
