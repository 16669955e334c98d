pub mod call_log;
pub mod client;
pub mod endpoints;
pub mod environment;
pub mod error;
pub mod transport;

pub use call_log::{CallLogSubscription, CallRecorder, CallStatus, LogEntry};
pub use client::TriageApi;
pub use environment::{BaseUrls, Environment};
pub use error::FetchError;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, LoggedTransport, ReqwestTransport};
