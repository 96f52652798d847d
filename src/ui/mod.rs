//! Rendering-independent logic behind the blog widgets. Everything here is
//! plain Rust so it can be exercised with `cargo test` on the host.

pub mod clock;
pub mod modal;
pub mod model;
pub mod pagination;
pub mod popup;
pub mod request;
pub mod route;
pub mod scroll;
pub mod toc;
pub mod typewriter;
