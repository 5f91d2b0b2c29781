pub mod http_backend;
pub mod terminal_view;

pub use http_backend::HttpBackend;
pub use terminal_view::TerminalView;
