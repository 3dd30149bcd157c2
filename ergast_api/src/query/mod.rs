mod common;
pub use self::common::Query;

mod page;
pub use self::page::PageQuery;
