use app_api::AppContext;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
    /// Cancelled when the server begins shutting down.
    pub shutdown: CancellationToken,
}

impl HttpState {
    pub fn new(context: AppContext, shutdown: CancellationToken) -> Self {
        Self { context, shutdown }
    }
}
