//! Tamias Resource Steward
//!
//! # Overview
//!
//! `tamias-core` is a deadlock-avoidance engine built on the banker's
//! algorithm: processes declare their worst-case resource claims up
//! front, and every allocation request is granted only when some
//! completion order for all processes provably survives it.
//!
//! # Architecture
//!
//! The crate is a single pure domain layer:
//!
//! - **Ledger**: the Available/Maximum/Allocated/Need data model
//! - **Safety**: the oracle that searches for a safe completion order
//! - **Banker**: the request/release protocol composing the two
//!
//! # TLA+ Verification
//!
//! The core protocol is specified in TLA+:
//!
//! - `Banker`: Corresponds to `specs/tla/Banker.tla`
//!
//! # Ledger Laws (Invariants)
//!
//! The engine enforces these fundamental invariants:
//!
//! ## Conservation Laws
//! - **C-001**: Conservation - Allocated column sum + Available equals capacity
//! - **C-002**: Claim Ceiling - Holdings never exceed the declared maximum
//! - **C-003**: Need Consistency - Need = Maximum − Allocated, per cell
//!
//! ## Safety Laws
//! - **S-001**: Safety Preservation - A granted request leaves a safe state
//! - **S-002**: Determinism - The oracle's verdict is a pure function of state
//!
//! # Usage
//!
//! ```rust
//! // 필요한 타입들을 명시적으로 가져옵니다.
//! use tamias_core::domain::{BankerBuilder, ProcessId, ResourceId};
//!
//! // 1. 빌더를 사용하여 은행원 서비스 조립
//! let banker = BankerBuilder::new()
//!     .capacities(&[10, 5, 7])
//!     .process(&[7, 5, 3], &[0, 1, 0])
//!     .process(&[3, 2, 2], &[2, 0, 0])
//!     .process(&[9, 0, 2], &[3, 0, 2])
//!     .process(&[2, 2, 2], &[2, 1, 1])
//!     .process(&[4, 3, 3], &[0, 0, 2])
//!     .build()
//!     .unwrap();
//!
//! // 2. 자원 요청 (안전성 검사 포함)
//! banker.request(ProcessId::new(1), ResourceId::new(0), 1).unwrap();
//!
//! // 3. 안전 순서 확인
//! let sequence = banker.find_safe_sequence().unwrap();
//! assert_eq!(sequence.len(), 5);
//! ```
//!
//! # Verification
//!
//! Kani proof harnesses live behind `cfg(kani)` and run with
//! `cargo kani`; they exercise the bounded `VerificationBackend`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod domain;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Service types
pub use domain::{Banker, BankerBuilder, ProductionBanker, VerificationBanker};

// Ledger types
pub use domain::{
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

// Safety types
pub use domain::{find_safe_sequence, is_safe, SafeSequence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// TLA+ specification version this implementation corresponds to
pub const TLA_SPEC_VERSION: &str = "1.0.0";
