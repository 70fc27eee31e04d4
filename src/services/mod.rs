pub mod domain;
pub mod session;

pub use domain::DomainService;
pub use session::SessionRegistry;
