//! Unit tests mirroring the `src` layout
