//! Composition of child containers into a derived parent machine.
//!
//! A parent learns about its children only through [`bind_many`]: the
//! children never know the parent exists. The binding follows a [`ChildSet`]
//! and switches to the latest collection whenever it is replaced, so at most
//! one combined subscription is live at a time.

mod binding;
mod children;

pub use binding::{bind_many, Binding};
pub use children::ChildSet;
