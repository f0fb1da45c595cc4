//! Contiguous memory allocation over a simulated address space.
//!
//! A [`BlockList`] models how an operating system hands out a fixed range of
//! memory to named processes. Free space is kept as holes between allocated
//! segments; requests are placed with one of the [`Strategy`] policies, and
//! [`BlockList::compact`] removes external fragmentation by sliding every
//! allocation to the bottom of the address space.
//!
//! # Examples
//!
//! ```
//! use block_list::{BlockList, ProcessName, Strategy};
//!
//! let mut memory = BlockList::new(100).unwrap();
//! let p1 = ProcessName::new("P1").unwrap();
//! let p2 = ProcessName::new("P2").unwrap();
//!
//! memory.allocate(p1, 30, Strategy::FirstFit).unwrap();
//! memory.allocate(p2, 20, Strategy::FirstFit).unwrap();
//! memory.release(&p1).unwrap();
//! memory.compact();
//!
//! let lines: Vec<String> = memory.report().map(|e| e.to_string()).collect();
//! assert_eq!(
//!     lines,
//!     ["Addresses [0:19] Process P2", "Addresses [20:99] Unused"],
//! );
//! ```
//!
//! # Performance
//!
//! Every operation is linear in the number of segments. The list never holds
//! more than one segment per process plus one hole between each pair of
//! processes.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub use self::{
    error::{AllocError, InvariantViolation},
    list::BlockList,
    name::{InvalidProcessName, MAX_NAME_LEN, ProcessName},
    report::{MemoryStats, ReportEntry, SegmentStatus},
    segment::{Segment, SegmentState},
    strategy::{Strategy, UnknownStrategy},
};

mod error;
mod list;
mod name;
mod report;
mod segment;
mod strategy;
