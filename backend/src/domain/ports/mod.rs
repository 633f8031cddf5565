//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod board_ports;
mod counter_store;
mod item_ports;

pub use board_ports::{BoardCommand, BoardQuery};
#[cfg(test)]
pub use counter_store::MockCounterStore;
pub use counter_store::{CounterStore, HashField, StoreError, WriteBatch, WriteOp};
pub use item_ports::{ItemCommand, ItemQuery};
