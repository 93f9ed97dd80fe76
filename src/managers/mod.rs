pub mod exports;
pub mod items;
pub mod operation;
