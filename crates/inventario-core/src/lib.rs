//! # inventario-core: Pure Domain Logic for Inventario
//!
//! This crate is the **heart** of Inventario. It contains the domain rules
//! for category hierarchies and lot state tracking as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                      Inventario Architecture                       │
//! │                                                                    │
//! │  ┌──────────────────────────────────────────────────────────────┐ │
//! │  │                    apps/api (axum)                           │ │
//! │  │    REST routes, Spanish wire DTOs, response envelopes        │ │
//! │  └─────────────────────────────┬────────────────────────────────┘ │
//! │                                │                                   │
//! │  ┌─────────────────────────────▼────────────────────────────────┐ │
//! │  │             ★ inventario-core (THIS CRATE) ★                 │ │
//! │  │                                                              │ │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────────┐  ┌───────────┐  │ │
//! │  │   │  types  │  │  tree   │  │ transitions │  │ validation│  │ │
//! │  │   │ Element │  │ builder │  │  lot FSM    │  │   rules   │  │ │
//! │  │   │Category │  │ forest  │  │  reasons    │  │   checks  │  │ │
//! │  │   └─────────┘  └─────────┘  └─────────────┘  └───────────┘  │ │
//! │  │                                                              │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │ │
//! │  └─────────────────────────────┬────────────────────────────────┘ │
//! │                                │                                   │
//! │  ┌─────────────────────────────▼────────────────────────────────┐ │
//! │  │                inventario-db (Database Layer)                │ │
//! │  │          SQLite queries, migrations, repositories            │ │
//! │  └──────────────────────────────────────────────────────────────┘ │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Element, Serial, Movement, status enums)
//! - [`tree`] - Category forest construction from flat lists
//! - [`transitions`] - Lot state machine: allowed transitions and suggested reasons
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **Tagged Kinds**: Serial-tracked and lot-tracked elements are distinct
//!    enum variants, never one struct with overlapping optional fields
//!
//! ## Example Usage
//!
//! ```rust
//! use inventario_core::types::{LotStatus, MovementReason};
//! use inventario_core::transitions::{is_transition_allowed, suggested_reason};
//!
//! // The rental desk moves three chairs out
//! assert!(is_transition_allowed(LotStatus::Available, LotStatus::Rented));
//! assert_eq!(
//!     suggested_reason(LotStatus::Available, LotStatus::Rented),
//!     MovementReason::RentedOut,
//! );
//!
//! // Retired stock never comes back
//! assert!(!is_transition_allowed(LotStatus::Retired, LotStatus::Available));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod transitions;
pub mod tree;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use inventario_core::Element` instead of
// `use inventario_core::types::Element`

pub use error::{CoreError, CoreResult, ValidationError};
pub use tree::{build_tree, CategoryNode};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length for category and element names.
///
/// ## Business Reason
/// Names render in list rows and tree nodes; anything longer than this is
/// almost certainly a paste error.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a serial number.
///
/// ## Business Reason
/// Covers every label format seen in intake so far (manufacturer codes,
/// internal asset tags) with generous slack.
pub const MAX_SERIAL_NUMBER_LENGTH: usize = 100;
