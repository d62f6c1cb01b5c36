pub mod coordinates;
pub mod error;
pub mod link;
pub mod object_id;
pub mod record;

pub use coordinates::Coordinates;
pub use error::{Error, Result};
pub use link::{encode_query_value, Origin, TrackingLink};
pub use object_id::ObjectId;
pub use record::{LocationRecord, NewLocationRecord, DEFAULT_SUBMITTING_AGENT};
