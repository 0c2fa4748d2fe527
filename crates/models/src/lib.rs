mod edition;
mod limits;
mod target;
mod status;

pub use edition::{Edition, DEFAULT_BEDROCK_PORT, DEFAULT_JAVA_PORT};
pub use limits::{MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};
pub use target::{ServerTarget, TargetDefaults};
pub use status::{DownFlag, Players, StatusResult, UpFlag};
