//! Entity module - SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod shipment;

pub use shipment::{Entity as Shipment, Model as ShipmentModel};
