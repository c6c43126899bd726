//! Integration tests live under `tests/`; this crate ships no code.
