// Request Dispatch
// Starts appliance requests off the UI thread and queues their completions

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::api::{execute, ApiRequest, ApplianceApi, Outcome};
use super::error::SyncResult;

/// Identifies one dispatched request; later requests compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished request, delivered back to the UI thread
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub request: ApiRequest,
    pub result: SyncResult<Outcome>,
}

/// Starts requests without blocking the caller
pub trait Dispatcher {
    fn dispatch(&self, id: RequestId, request: ApiRequest);
}

/// Dispatcher that runs each request as a tokio task
pub struct TaskDispatcher<A> {
    api: Arc<A>,
    runtime: Handle,
    completions: UnboundedSender<Completion>,
}

impl<A: ApplianceApi> TaskDispatcher<A> {
    /// Create the dispatcher and the receiving end of its completion queue
    pub fn new(api: A, runtime: Handle) -> (Self, UnboundedReceiver<Completion>) {
        let (completions, receiver) = unbounded_channel();
        let dispatcher = Self {
            api: Arc::new(api),
            runtime,
            completions,
        };
        (dispatcher, receiver)
    }
}

impl<A: ApplianceApi> Dispatcher for TaskDispatcher<A> {
    fn dispatch(&self, id: RequestId, request: ApiRequest) {
        let api = Arc::clone(&self.api);
        let completions = self.completions.clone();

        self.runtime.spawn(async move {
            let result = execute(api.as_ref(), &request).await;
            if completions
                .send(Completion {
                    id,
                    request,
                    result,
                })
                .is_err()
            {
                tracing::debug!(%id, "Completion dropped, console already closed");
            }
        });
    }
}
