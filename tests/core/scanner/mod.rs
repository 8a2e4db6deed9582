//! Scanner pipeline tests

pub mod test_orchestrator;
