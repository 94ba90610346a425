//! Workspace-level tests for `region_gen`; see `tests/`.
