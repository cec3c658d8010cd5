//! Chat synchronisation: polling, deduplication, optimistic sends.
//!
//! - `view_model` - pure bookkeeping that turns fetch results into render instructions
//! - `dates` - date section labels and time formatting
//! - `transport` - the HTTP endpoints
//! - `driver` - the fetch cycle, the send path and the poll timer
pub mod dates;
pub mod driver;
pub mod transport;
pub mod view_model;

pub use driver::{ChatSurface, PollState, Poller, fetch_cycle, submit};
pub use transport::{ChatError, ChatResult, ChatTransport, HttpTransport};
pub use view_model::{ChatViewModel, MessageView, RenderOp, ScrollMetrics};
