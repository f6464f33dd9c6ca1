//! Command handlers organized by subject.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `tablets` | ListAllTablets, ListTablets, GetTablet |
//! | `debug` | Panic |

pub mod debug;
pub mod tablets;
