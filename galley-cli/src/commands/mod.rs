//! CLI command implementations.

pub mod build;
pub mod check;
pub mod ci;
pub mod deploy;
pub mod init;
pub mod publish;
pub mod serve;

pub use build::build_site;
pub use check::check_sources;
pub use ci::setup_ci;
pub use deploy::deploy_site;
pub use init::init_project;
pub use publish::publish_output;
pub use serve::serve_site;
