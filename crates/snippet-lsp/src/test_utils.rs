//! Test utilities for building an unconnected LSP client.
