pub mod conditional;
pub mod definition;
pub mod flow_type;
pub mod id;
pub mod legacy;

pub use conditional::*;
pub use definition::*;
pub use flow_type::*;
pub use id::FlowId;
pub use legacy::*;
