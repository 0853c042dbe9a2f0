pub mod play;
pub mod scheduler;

pub use play::PlayMode;
pub use scheduler::TickScheduler;
