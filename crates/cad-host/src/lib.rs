pub mod mock_host;
pub mod traits;
pub mod types;

pub use mock_host::{HostCall, HostCallKind, MockDimension, MockHost, DEFAULT_THREAD_FAMILY};
pub use traits::*;
pub use types::*;
