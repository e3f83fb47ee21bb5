// Operations module
// Appliance requests, their dispatch and the list sync controller

pub mod api;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod failure;
pub mod http;

pub use api::{execute, ApiRequest, ApplianceApi, Outcome};
pub use controller::{Applied, ListSurfaces, ListSyncController};
pub use dispatch::{Completion, Dispatcher, RequestId, TaskDispatcher};
pub use error::{SyncError, SyncResult};
pub use failure::{Failure, FailureChannel, LogFailures, Notice, NoticeBoard};
pub use http::{flag_wire_value, HttpApplianceApi};
