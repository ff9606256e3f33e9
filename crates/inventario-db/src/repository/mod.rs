//! # Repository Pattern Implementation
//!
//! Each repository owns the SQL for one aggregate and exposes typed async
//! methods. Handlers never see SQL; repositories never see HTTP.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         Repositories                             │
//! │                                                                  │
//! │  CategoryRepository   tree queries + transactional cascade       │
//! │  ElementRepository    element CRUD (+ serials on create)         │
//! │  SerialRepository     serial CRUD, keeps element.quantity in     │
//! │                       sync inside the same transaction           │
//! │  MovementRepository   bucket transfers + append-only history     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method that touches more than one row runs inside a single
//! transaction; an error drops the transaction and rolls everything back.

mod category;
mod element;
mod movement;
mod serial;

pub use category::CategoryRepository;
pub use element::{ElementChanges, ElementRepository};
pub use movement::MovementRepository;
pub use serial::SerialRepository;
