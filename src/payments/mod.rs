pub mod schedule;

pub use schedule::{EvenSplit, InstallmentSchedule, ScheduledInstallment};
