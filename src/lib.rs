pub mod config;
pub mod exception;
pub mod param;
pub mod request;
pub mod resource;
pub mod response;
pub mod restconf;
pub mod router;
pub mod server;
pub mod util;
pub mod yang;

pub use config::Config;
pub use exception::Exception;
pub use param::{HttpRequestMethod, HttpVersion, MediaType};
pub use request::Request;
pub use resource::{HostMeta, Representation, RestconfRoot, YangLibraryVersion};
pub use response::Response;
pub use router::Router;
pub use yang::{DirectoryLoader, ModuleLoader, SchemaEntry, YangError};
