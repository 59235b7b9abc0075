pub mod create;
pub mod fields;
pub mod issue;
