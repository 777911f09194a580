//! # Pizzapets Data
//!
//! Plain data shared by the engine, the I/O layer and the runner: the
//! rules document as served by the data source, feeding events, history
//! entries and pet snapshots.

pub mod data;

pub use data::configuration::{
    BehaviorConfig, BlockRange, Configuration, DoomsdayDevicesConfig, EvolutionStateConfig,
    HazardConfig, ItemConfig, Location,
};
pub use data::event::{ChildrenPage, EventMap, FeedingEvent};
pub use data::history::{HistoryEvent, HistoryKind};
pub use data::ordered::OrderedMap;
pub use data::pet::{
    Buff, HealthComponents, ImmediateEffects, PetSnapshot, PetState, ResistanceWindow,
    TriggeredHazard,
};
