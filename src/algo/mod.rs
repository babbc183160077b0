//! Loop selection algorithms.
//!
//! This module contains the operations a host editor calls, each taking a
//! [`TopologyModel`](crate::mesh::TopologyModel) and a
//! [`Selection`](crate::selection::Selection) and returning an
//! [`Outcome`](crate::selection::Outcome):
//!
//! - **Loops**: natural and face loops, ranked candidate enumeration, and
//!   interactive loop selection with candidate cycling
//! - **Classification**: loop, chain, region or mixed
//! - **Resizing**: grow/shrink by one ring, loop-aware where possible
//! - **Closing**: shortest, straightest paths that close open chains

pub mod classify;
pub mod close;
pub mod loops;
pub mod resize;
