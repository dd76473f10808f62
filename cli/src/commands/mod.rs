pub mod info;
pub mod recovery;
pub mod send;
