pub mod discovery;
pub mod endpoints;
pub mod pacer;
pub mod probe;
pub mod resolver;
pub mod token;
pub mod types;

pub use discovery::Discovery;
pub use endpoints::TwitchEndpoints;
pub use resolver::StatusResolver;
pub use types::{ChannelId, ChannelStatus, ResultSet};
