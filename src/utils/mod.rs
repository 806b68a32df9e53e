pub mod cookies;
pub mod html;
