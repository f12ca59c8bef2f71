pub mod into_stream;
