pub mod comparator;
pub mod diff;
pub mod path;

pub use comparator::JsonComparator;
pub use diff::JsonDiff;
pub use path::JsonPath;
