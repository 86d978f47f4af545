//! Network layer: REST calls, the push-channel client, and the engine
//! action dispatcher.

pub mod api;
pub mod dispatch;
pub mod push;
