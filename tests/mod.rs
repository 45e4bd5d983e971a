//! Integration test modules for autosweep.
//!
//! This module organizes all integration tests that verify
//! end-to-end behavior of the collection framework.
