mod backend;
mod errors;
mod motd;
mod normalize;
mod prober;
mod response;
mod timeout;
pub mod net;

pub use backend::{ServerHandle, StatusBackend};
pub use errors::ProbeError;
pub use motd::{clean, strip_codes, MotdSource, RichText};
pub use normalize::{normalize, NormalizedStatus};
pub use prober::Prober;
pub use response::{BedrockStatus, JavaPlayers, JavaStatus, StatusResponse, VersionInfo};
pub use timeout::{ambient_timeout, probe_timeout, AmbientTimeoutGuard, MIN_PROBE_TIMEOUT};
pub use net::NetworkBackend;
