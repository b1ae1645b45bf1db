// Record and input types
pub mod records;

// Feature engineering, scaling and synthetic training data
pub mod ml;

// Repository traits
pub mod repositories;

// Aggregates over stored records
pub mod statistics;

// Request payload validation
pub mod validation;

// Domain-specific error types
pub mod errors;
