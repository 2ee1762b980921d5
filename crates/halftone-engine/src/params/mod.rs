//! Tunable parameters and their bindings into the material.
//!
//! Edits flow one way: control surface → [`ParameterStore::apply_edit`] →
//! [`binding`] → material uniform or clear color. Nothing flows back.

mod binding;
mod controls;
mod store;
mod values;

pub use binding::{binding, Binding, ParamId, ParamTargets, ParamValue};
pub use controls::{ControlKind, ControlSpec, ControlSurface, CONTROLS};
pub use store::{ParamEdit, ParamError, ParameterStore};
pub use values::{MaterialParameters, RendererParameters};
