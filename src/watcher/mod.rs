pub mod routes;
pub mod watcher_dto;
pub mod watcher_handlers;
pub mod watcher_models;
pub mod watcher_repository;
pub mod watcher_service;

pub use watcher_dto::{CreateWatcherRequest, NotifiedSlotsResponse, SetActiveRequest, WatcherDetailResponse};
pub use watcher_models::{Watcher, WatcherSummary};
pub use watcher_repository::WatcherRepository;
pub use watcher_service::WatcherService;
