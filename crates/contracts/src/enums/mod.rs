pub mod delivery_bucket;

pub use delivery_bucket::{DeliveryCategory, DeliveryTimeBucket};
