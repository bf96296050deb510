pub mod driver;
pub mod plan;
pub mod session;

pub use driver::StreamRunner;
pub use plan::{MessagePlan, PlanEntry};
pub use session::StreamSession;
