pub mod dense;
pub mod rowset;
pub mod sparse;
