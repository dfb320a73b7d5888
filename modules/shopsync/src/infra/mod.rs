pub mod source;
pub mod storage;
