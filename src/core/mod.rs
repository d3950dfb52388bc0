//! Core desk logic, independent of any front end.

/// Derived totals
pub mod derivation;
/// Form, list and store wired together
pub mod desk;
/// Field catalog and form tabs
pub mod fields;
/// Working form state and payload packaging
pub mod form;
/// Change-feed subscription
pub mod subscription;
/// Modules, layout toggles and table rows
pub mod view;
