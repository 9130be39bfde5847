pub mod page;
pub mod patterns;

pub use page::PageScanner;
