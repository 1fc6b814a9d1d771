pub mod entry;
pub mod sport;

pub use entry::{date_key, parse_date_key, NewTrainingEntry, TrainingEntry};
pub use sport::{normalize_color, normalize_sport, Sport, DEFAULT_SPORT_COLOR};
