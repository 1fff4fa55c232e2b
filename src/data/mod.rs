//! Price data: the loaded history, its shared snapshot, price lookup, and
//! static region reference tables.

pub mod history;
pub mod lookup;
pub mod regions;
pub mod store;

pub use history::{LoadOptions, LoadStats, PriceHistory};
pub use lookup::lookup;
pub use store::{HistoryStore, SourceId};
