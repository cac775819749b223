pub mod cleanup;
pub mod fanout;
pub mod response;
pub mod upload;
