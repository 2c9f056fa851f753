//! Client and parsers for the navstevalekara.sk booking site.

pub mod booking_client;
pub mod booking_parser;
pub mod booking_weeks;

pub use booking_client::{BookingClient, WeekSource};
pub use booking_parser::{doctor_name_from_url, extract_doctor_code, parse_available_slots};
pub use booking_weeks::{expand_week_range, week_offsets_for_dates, MAX_WEEK_OFFSET};
