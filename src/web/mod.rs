//! Front-end page routes.
//!
//! The browser app is a single bundle under `/assets`. Every page path
//! returns the same HTML shell, tagged with the component to mount.

mod pages;

pub use pages::{page_routes, resolve, PageRoute, PAGE_ROUTES};
