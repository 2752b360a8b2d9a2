//! Object deserialization from file streams.

mod deserializer;
mod model;

pub use deserializer::{
    deserialize, post_deserialize, pre_deserialize, DeserializeError, Deserializer, InputStream,
    JsonDeserializer, LoadState, Serializable,
};
pub use model::{Model, ModelDocument};
