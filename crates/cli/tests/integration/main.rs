mod common;
mod pack_tests;
mod plan_tests;
