pub mod device;
pub mod feature;
pub mod plan;
pub mod status;
pub mod support_source;

pub use device::Device;
pub use feature::Feature;
pub use plan::Plan;
pub use status::Status;
pub use support_source::SupportSource;
