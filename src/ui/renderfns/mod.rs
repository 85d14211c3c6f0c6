pub mod footer;
pub mod header;
pub mod status_bar;

pub use footer::draw_footer;
pub use header::draw_header;
pub use status_bar::draw_status_bar;
