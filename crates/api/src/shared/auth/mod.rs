mod route_guards;

pub use route_guards::{protect_scheduler_route, SCHEDULER_KEY_HEADER};
