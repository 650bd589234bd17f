mod capsule;
mod scheduler;
mod status;

pub mod dtos {
    pub use crate::capsule::dtos::*;
    pub use crate::scheduler::dtos::*;
}

pub use crate::capsule::api::*;
pub use crate::scheduler::api::*;
pub use crate::status::api::*;
