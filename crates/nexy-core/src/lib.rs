//! Nexy Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Nexy parser and
//! the compiler driver. It includes:
//!
//! - **Component model**: props, imports and the parsed component handed from
//!   the parser to the generator ([`component`] module)
//! - **Naming**: the rules that turn source paths into importable module
//!   paths, render-function names and file-system-safe segments
//!   ([`naming`] module)
//!
//! # Pipeline Position
//!
//! ```text
//! .nexy / .mdx source
//!     ↓ scanner + sanitizer + logic parser + import validator + template parser
//! ParsedComponent (these types)
//!     ↓ generator
//! render function (.py) + template artifact (.html / .md)
//! ```

pub mod component;
pub mod naming;

pub use component::{ComponentType, NexyImport, NexyProp, ParsedComponent};
