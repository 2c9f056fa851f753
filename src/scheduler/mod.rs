pub mod watch_checker;
pub mod watch_scheduler;
pub mod watch_store;

#[cfg(test)]
mod test_support;

pub use watch_checker::WatchChecker;
pub use watch_scheduler::WatchScheduler;
pub use watch_store::PgWatchStore;
