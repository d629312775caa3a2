//! Core Types for the Resource Ledger

use std::fmt;

/// Number of resource instances (requests, holdings, capacities)
pub type Units = u32;

/// Process identifier (row index into the claim matrices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create a new process identifier
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying usize value
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Resource-type identifier (column index into the claim matrices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub usize);

impl ResourceId {
    /// Create a new resource-type identifier
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying usize value
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Construction-time configuration errors
///
/// Every variant is fatal to the construction attempt that produced it.
/// A ledger that constructs successfully satisfies all data-model
/// invariants at its first quiescent point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Process population is zero
    ZeroProcesses,

    /// Resource catalog is zero
    ZeroResources,

    /// A resource type was declared with no instances
    ZeroCapacity {
        /// The resource type with capacity 0
        resource: ResourceId,
    },

    /// Capacity vector length disagrees with the resource catalog
    CapacityCountMismatch {
        /// Expected number of capacities (resource catalog size)
        expected: usize,
        /// Number of capacities supplied
        actual: usize,
    },

    /// A claim matrix has the wrong number of rows
    RowCountMismatch {
        /// Which matrix ("maximum" or "allocated")
        matrix: &'static str,
        /// Expected row count (process population)
        expected: usize,
        /// Row count supplied
        actual: usize,
    },

    /// A claim matrix row has the wrong number of columns
    RowWidthMismatch {
        /// Which matrix ("maximum" or "allocated")
        matrix: &'static str,
        /// The offending row
        process: ProcessId,
        /// Expected column count (resource catalog size)
        expected: usize,
        /// Column count supplied
        actual: usize,
    },

    /// An initial allocation exceeds the declared maximum claim
    ClaimExceeded {
        /// The over-allocated process
        process: ProcessId,
        /// The resource type concerned
        resource: ResourceId,
        /// Units initially allocated
        allocated: Units,
        /// Declared maximum claim
        maximum: Units,
    },

    /// Initial allocations sum past the declared capacity
    OverSubscribed {
        /// The oversubscribed resource type
        resource: ResourceId,
        /// Declared capacity
        capacity: Units,
        /// Sum of initial allocations across all processes
        allocated: Units,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroProcesses => write!(f, "Process population must be at least 1"),
            Self::ZeroResources => write!(f, "Resource catalog must hold at least 1 type"),
            Self::ZeroCapacity { resource } => {
                write!(f, "Resource {} declared with zero capacity", resource)
            }
            Self::CapacityCountMismatch { expected, actual } => {
                write!(f, "Expected {} capacities, got {}", expected, actual)
            }
            Self::RowCountMismatch { matrix, expected, actual } => {
                write!(f, "Matrix '{}' has {} rows, expected {}", matrix, actual, expected)
            }
            Self::RowWidthMismatch { matrix, process, expected, actual } => {
                write!(
                    f,
                    "Matrix '{}' row {} has {} columns, expected {}",
                    matrix, process, actual, expected
                )
            }
            Self::ClaimExceeded { process, resource, allocated, maximum } => {
                write!(
                    f,
                    "Process {} starts with {} of {} but claims at most {}",
                    process, allocated, resource, maximum
                )
            }
            Self::OverSubscribed { resource, capacity, allocated } => {
                write!(
                    f,
                    "Resource {} has capacity {} but {} units are initially allocated",
                    resource, capacity, allocated
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by the allocation protocol
///
/// All variants are recoverable by the caller: index errors by fixing the
/// arguments, the remaining three by requesting less or retrying after
/// other processes release. A rejected call leaves the ledger exactly as
/// it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Process ID out of bounds
    InvalidProcess(ProcessId),

    /// Resource ID out of bounds
    InvalidResource(ResourceId),

    /// Request would push holdings past the declared maximum claim
    ExceedsMaxClaim {
        /// The requesting process
        process: ProcessId,
        /// The requested resource type
        resource: ResourceId,
        /// Units requested
        requested: Units,
        /// Units the process may still claim
        need: Units,
    },

    /// Fewer units are currently available than requested
    InsufficientAvailable {
        /// The requested resource type
        resource: ResourceId,
        /// Units requested
        requested: Units,
        /// Units currently unreserved
        available: Units,
    },

    /// Granting the request would leave no safe sequence
    WouldCauseUnsafeState {
        /// The requesting process
        process: ProcessId,
        /// The requested resource type
        resource: ResourceId,
        /// Units requested
        requested: Units,
    },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProcess(p) => write!(f, "Invalid process ID: {}", p),
            Self::InvalidResource(r) => write!(f, "Invalid resource ID: {}", r),
            Self::ExceedsMaxClaim { process, resource, requested, need } => {
                write!(
                    f,
                    "Process {} requested {} of {} beyond its remaining claim of {}",
                    process, requested, resource, need
                )
            }
            Self::InsufficientAvailable { resource, requested, available } => {
                write!(
                    f,
                    "Requested {} of {} but only {} available",
                    requested, resource, available
                )
            }
            Self::WouldCauseUnsafeState { process, resource, requested } => {
                write!(
                    f,
                    "Granting {} of {} to {} would leave no safe sequence",
                    requested, resource, process
                )
            }
        }
    }
}

impl std::error::Error for RequestError {}
