//! Integration tests against an in-process fake backend

mod api_tests;
mod backend;
mod notifications_tests;
mod services_tests;
