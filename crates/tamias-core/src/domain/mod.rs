//! Domain Layer - The Avoidance Machinery Assembly
//!
//! # Architecture Overview
//!
//! This module brings together all domain components with zero runtime
//! overhead:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Ledger Module                 Safety Module                │
//! │  ├─ Ledger<B>                  ├─ find_safe_sequence        │
//! │  ├─ LedgerSnapshot             ├─ is_safe                   │
//! │  ├─ ProductionBackend          └─ SafeSequence              │
//! │  └─ VerificationBackend                                     │
//! │                                                             │
//! │                   Banker Module                             │
//! │                   ├─ Banker<B>                              │
//! │                   └─ request / release / release_all        │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Type Aliases for Convenience
//!
//! We provide convenient aliases for common configurations:
//!
//! - `ProductionBanker`: runtime-sized, heap-backed service
//! - `VerificationBanker`: Kani-friendly bounded service
//!
//! # Monomorphization
//!
//! When you use `ProductionBanker`, the compiler generates:
//! ```text
//! Banker<ProductionBackend>
//!   └─ All backend calls inlined
//!   └─ Row-major boxed-slice arenas
//!   └─ Zero abstraction overhead
//! ```
//!
//! When you use `VerificationBanker`, the compiler generates:
//! ```text
//! Banker<VerificationBackend>
//!   └─ All backend calls inlined
//!   └─ Fixed stack arrays, no heap
//!   └─ Kani can verify everything
//! ```

pub mod banker;
pub mod ledger;
pub mod safety;

// Re-export the service
pub use banker::Banker;

// Re-export ledger types
pub use ledger::{
    ConfigError,
    ConfigurableBackend,
    Ledger,
    LedgerBackend,
    LedgerSnapshot,
    ProcessId,
    ProductionBackend,
    RequestError,
    ResourceId,
    Units,
    VerificationBackend,
};

// Re-export safety types
pub use safety::{find_safe_sequence, is_safe, SafeSequence};

/// Production banker with runtime dimensions
///
/// # Configuration
///
/// Uses `ProductionBackend`: four heap arenas sized at construction,
/// row-major, no further allocation on the request path apart from the
/// candidate snapshot the oracle examines.
///
/// # Example
///
/// ```rust
/// use tamias_core::domain::*;
///
/// let banker = BankerBuilder::new()
///     .capacities(&[10, 5, 7])
///     .process(&[7, 5, 3], &[0, 1, 0])
///     .process(&[3, 2, 2], &[2, 0, 0])
///     .process(&[9, 0, 2], &[3, 0, 2])
///     .process(&[2, 2, 2], &[2, 1, 1])
///     .process(&[4, 3, 3], &[0, 0, 2])
///     .build()
///     .unwrap();
///
/// assert!(banker.is_safe());
/// banker.request(ProcessId::new(1), ResourceId::new(0), 1).unwrap();
/// ```
pub type ProductionBanker = Banker<ledger::ProductionBackend>;

/// Verification banker for Kani formal verification
///
/// # Configuration
///
/// Uses `VerificationBackend`: stack-resident fixed arrays bounded by
/// `MAX_PROCESSES` and `MAX_RESOURCES`, sized to hold the classic
/// five-process, three-resource instance.
///
/// # Verification Characteristics
///
/// - Stack-only: no heap allocation
/// - Bounded capacity: 5 processes, 3 resource types
/// - Same protocol as production: parity tests replay one scenario on both
pub type VerificationBanker = Banker<ledger::VerificationBackend>;

/// Factory for assembling a banker from its data model
///
/// Rows are declared one process at a time; dimensions fall out of the
/// declared data. Validation happens once, in `build`, with the same
/// rules for both backends.
///
/// ```rust
/// use tamias_core::domain::*;
///
/// let banker = BankerBuilder::new()
///     .capacities(&[2, 1])
///     .process(&[1, 1], &[0, 0])
///     .process(&[2, 0], &[1, 0])
///     .build()
///     .unwrap();
/// assert_eq!(banker.num_processes(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BankerBuilder {
    capacities: Vec<Units>,
    maximum: Vec<Vec<Units>>,
    allocated: Vec<Vec<Units>>,
}

impl BankerBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set total instances per resource type
    pub fn capacities(mut self, capacities: &[Units]) -> Self {
        self.capacities = capacities.to_vec();
        self
    }

    /// Declare one process: its claim ceiling and starting holdings
    pub fn process(mut self, maximum: &[Units], allocated: &[Units]) -> Self {
        self.maximum.push(maximum.to_vec());
        self.allocated.push(allocated.to_vec());
        self
    }

    /// Build on the heap-backed production backend
    pub fn build(self) -> Result<ProductionBanker, ConfigError> {
        let backend = ProductionBackend::new(self.maximum.len(), self.capacities.len());
        let ledger = Ledger::new(backend, &self.capacities, &self.maximum, &self.allocated)?;
        Ok(Banker::new(ledger))
    }

    /// Build on the bounded verification backend
    ///
    /// Panics if the declared dimensions exceed the compile-time bounds,
    /// matching the backend's own contract.
    pub fn build_verification(self) -> Result<VerificationBanker, ConfigError> {
        let backend = VerificationBackend::with_dims(self.maximum.len(), self.capacities.len());
        let ledger = Ledger::new(backend, &self.capacities, &self.maximum, &self.allocated)?;
        Ok(Banker::new(ledger))
    }
}
