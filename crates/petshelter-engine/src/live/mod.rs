//! Live queries: push-based subscriptions over store queries.
//!
//! A subscriber receives the query's current result as soon as it
//! subscribes and a fresh result after every committed write to a table
//! the query reads. Results delivered to one subscription are never older
//! than a result it already received.

mod callback;
mod query;
mod registry;

pub use callback::{LiveQueryCallback, LiveQueryHandle};
pub use query::{AllPets, LiveQuery, PetById};
pub use registry::{LiveQueryRegistry, LiveWatch, SubscriptionConfig, SubscriptionId};
