mod common;
mod hoist_tests;
