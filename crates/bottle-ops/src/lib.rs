pub mod fillet;
pub mod geometry;
pub mod host_ext;
pub mod material;
pub mod profile;
pub mod revolve;
pub mod scale;
pub mod selection;
pub mod shell;
pub mod sketch;
pub mod thread;
pub mod thread_pitch;
pub mod types;

pub use fillet::execute_fillet;
pub use host_ext::HostBundle;
pub use material::{execute_appearance, execute_material};
pub use profile::{validate_outline, ProfileBuilder, DEFAULT_ARC_BIAS};
pub use revolve::execute_revolve;
pub use scale::execute_scale;
pub use shell::execute_shell;
pub use sketch::execute_sketch;
pub use thread::{execute_thread, ThreadRequest};
pub use thread_pitch::select_thread_pitch;
pub use types::*;
