//! Foundation types for symdep.
//!
//! This module provides the primitive vocabulary shared by the parsing and
//! semantic layers:
//! - [`DependencyPath`] - a dot-joined attribute path such as `a.b.c`
//!
//! This module has NO dependencies on other symdep modules.

mod path;

pub use path::DependencyPath;
