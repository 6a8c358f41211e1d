//! Token strategies.
//!
//! The workflow API rejects requests whose encoding/client-time pairing it
//! no longer accepts, and there is no way to ask for a fresh one. An
//! operation therefore tries a fixed sequence of candidate token sets:
//!
//! 1. An explicit per-call override (aborts the chain on failure)
//! 2. The active tokens as stored
//! 3. The active encoding with a freshly generated client time
//! 4. The example tokens of the targeted known location
//!
//! A plan is built once per operation and then run by [`execute`].

mod cache;
mod clock;
mod engine;
mod plan;

pub use cache::{ActiveTokenInfo, TokenCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{Outcome, execute};
pub use plan::{
    OnFailure, OnSuccess, Strategy, StrategyKind, StrategyOptions, TokenSource, build_plan,
    override_label, refreshed_label,
};
