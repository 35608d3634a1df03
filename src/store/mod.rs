//! In-memory stores. Each one is cheap to clone and shares its data, so a
//! clone handed to a request handler sees the same records.

mod cycles;
mod entries;
mod predictions;
mod settings;

pub use cycles::CycleStore;
pub use entries::{group_periods, EntryStore};
pub use predictions::{PredictionStore, HISTORY_LIMIT};
pub use settings::SettingsStore;
