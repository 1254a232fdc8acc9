//! # Cloth
//!
//! Verlet particles joined by position-based distance constraints.
//!
//! ## Table of Contents
//!
//! 1. **SpringNode** - Verlet point mass (`node`)
//! 2. **Spring** - PBD distance constraint (`spring`)
//! 3. **SailGrid** - Triangular node/spring arena with render topology (`grid`)

pub mod grid;
pub mod node;
pub mod spring;

pub use grid::{GridStiffness, SailGrid};
pub use node::SpringNode;
pub use spring::{relax, Spring, SpringKind};
