//! Unit test module
//!
//! Handler unit tests live here, separate from source files.

mod mock_bot;
