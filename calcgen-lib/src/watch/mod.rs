//! Polling for changes to the data documents
//!
//! A [`Watcher`] re-stats a fixed set of paths and reports the ones whose modification time
//! moved forward. [`watch_forever`] drives it on a fixed period and reruns a regeneration
//! closure once per cycle in which anything changed. Regeneration runs on the blocking pool
//! so a panic or error in one cycle is logged and the loop keeps going.

mod poll_loop;
mod watcher;

pub use poll_loop::{CycleOutcome, run_cycle, watch_forever};
pub use watcher::{PathState, Watcher};
