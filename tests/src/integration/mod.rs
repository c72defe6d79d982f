//! End-to-end relay scenarios against mock peers.

mod concurrency;
mod relay_flow;
