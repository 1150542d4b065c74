// Purpose: Drive repeated renders from outside the synthesis core

pub mod scheduler;

pub use scheduler::{interval_for_bpm, Scheduler, SchedulerHandle};
