pub mod slot_models;
pub mod slot_repository;

pub use slot_models::{NotifiedSlot, Slot};
pub use slot_repository::SlotRepository;
