use insights_app::{AnalyticsParams, Result};
use insights_core::AnalyticsReport;
use tokio_util::sync::CancellationToken;

use crate::{AnalyticsRequest, AppContext, OkResponse};

pub async fn analytics(
    ctx: &AppContext,
    req: AnalyticsRequest,
    cancel: CancellationToken,
) -> Result<AnalyticsReport> {
    let params = AnalyticsParams::from(req);
    ctx.app_state.services.analytics.report(&params, cancel).await
}

pub fn health(_ctx: &AppContext) -> Result<OkResponse> {
    Ok(OkResponse { ok: true })
}
