pub mod remote;
pub mod retry;

pub use remote::RemoteSource;
