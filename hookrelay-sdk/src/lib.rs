//! Wire-level types for Hookrelay.
//!
//! Everything a webhook receiver or an admin client needs to understand what
//! Hookrelay sends: the event record and its closed taxonomy, the normalized
//! model snapshots, the delivery envelope, and the admin API objects.

pub mod objects;
