pub mod mediainfo;
pub mod models;
pub mod notifications;
pub mod origin;
pub mod search;

pub use mediainfo::MediainfoClient;
pub use models::MetadataRecord;
pub use notifications::{notification_stream, ConnectionStatus, Notification, ReconnectPolicy};
pub use origin::Origin;
pub use search::{search_queries, SearchTemplates};
