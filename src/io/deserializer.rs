use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::debug;

use super::model::{Model, ModelDocument};

/// Errors from deserializing objects
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("Deserializer has no stream, attach() it to a stream")]
    NotAttached,
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name}::{hook}(): Implementation error: base {hook}() not called!")]
    HookNotChained { name: String, hook: &'static str },
}

/// Byte stream a deserializer reads from.
pub type InputStream = Box<dyn Read + Send>;

/// Tracks whether the base load hooks ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadState {
    pre: bool,
    post: bool,
}

impl LoadState {
    pub fn mark_pre(&mut self) {
        self.pre = true;
    }

    pub fn mark_post(&mut self) {
        self.post = true;
    }

    pub fn pre_done(&self) -> bool {
        self.pre
    }

    pub fn post_done(&self) -> bool {
        self.post
    }
}

/// An object that can be restored by a [`Deserializer`].
///
/// The default hooks are the base behavior. An implementor overriding a hook
/// must still call `self.load_state().mark_pre()` (or `mark_post()`), or
/// [`pre_deserialize`]/[`post_deserialize`] report an implementation error.
pub trait Serializable {
    fn name(&self) -> &str;

    fn load_state(&mut self) -> &mut LoadState;

    /// Runs before the object's fields are read.
    fn load_serializable_pre(&mut self) {
        self.load_state().mark_pre();
    }

    /// Runs after all fields were read.
    fn load_serializable_post(&mut self) {
        self.load_state().mark_post();
    }
}

/// Run the pre-load hook and verify the base behavior was chained.
pub fn pre_deserialize(obj: &mut dyn Serializable) -> Result<(), DeserializeError> {
    obj.load_state().pre = false;
    obj.load_serializable_pre();
    if !obj.load_state().pre_done() {
        return Err(DeserializeError::HookNotChained {
            name: obj.name().to_string(),
            hook: "load_serializable_pre",
        });
    }
    Ok(())
}

/// Run the post-load hook and verify the base behavior was chained.
pub fn post_deserialize(obj: &mut dyn Serializable) -> Result<(), DeserializeError> {
    obj.load_state().post = false;
    obj.load_serializable_post();
    if !obj.load_state().post_done() {
        return Err(DeserializeError::HookNotChained {
            name: obj.name().to_string(),
            hook: "load_serializable_post",
        });
    }
    Ok(())
}

/// Trait for object readers - the stream must be attached before reading
pub trait Deserializer {
    type Object: Serializable;

    fn attach(&mut self, stream: InputStream);

    /// The attached stream, or [`DeserializeError::NotAttached`].
    fn stream(&mut self) -> Result<&mut InputStream, DeserializeError>;

    /// Read one object from the attached stream, running its load hooks.
    fn read_object(&mut self) -> Result<Self::Object, DeserializeError>;
}

/// Reads [`Model`]s from `{"name": ..., "params": {...}}` JSON documents.
#[derive(Default)]
pub struct JsonDeserializer {
    stream: Option<InputStream>,
}

impl JsonDeserializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deserializer for JsonDeserializer {
    type Object = Model;

    fn attach(&mut self, stream: InputStream) {
        self.stream = Some(stream);
    }

    fn stream(&mut self) -> Result<&mut InputStream, DeserializeError> {
        self.stream.as_mut().ok_or(DeserializeError::NotAttached)
    }

    fn read_object(&mut self) -> Result<Model, DeserializeError> {
        let document: ModelDocument = serde_json::from_reader(self.stream()?)?;

        let mut model = Model::new(document.name);
        pre_deserialize(&mut model)?;
        model.params = document.params;
        post_deserialize(&mut model)?;

        debug!(
            "Read model '{}' with {} parameter(s)",
            model.name,
            model.params.len()
        );
        Ok(model)
    }
}

/// Open `path` and read one object from it through `deserializer`.
pub fn deserialize<D: Deserializer>(
    path: impl AsRef<Path>,
    deserializer: &mut D,
) -> Result<D::Object, DeserializeError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DeserializeError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    deserializer.attach(Box::new(BufReader::new(file)));
    deserializer.read_object()
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    /// Overrides the pre hook without chaining the base behavior.
    struct ForgetfulObject {
        state: LoadState,
    }

    impl Serializable for ForgetfulObject {
        fn name(&self) -> &str {
            "ForgetfulObject"
        }

        fn load_state(&mut self) -> &mut LoadState {
            &mut self.state
        }

        fn load_serializable_pre(&mut self) {}
    }

    #[test]
    fn test_stream_not_attached() {
        let mut deser = JsonDeserializer::new();
        assert!(matches!(deser.stream(), Err(DeserializeError::NotAttached)));
        assert!(matches!(
            deser.read_object(),
            Err(DeserializeError::NotAttached)
        ));
    }

    #[test]
    fn test_read_object_from_attached_stream() {
        let mut deser = JsonDeserializer::new();
        deser.attach(Box::new(Cursor::new(
            r#"{"name": "LinearMachine", "params": {"bias": 0.5}}"#,
        )));

        let model = deser.read_object().unwrap();
        assert_eq!(model.name, "LinearMachine");
        assert_eq!(model.params["bias"], serde_json::json!(0.5));
        assert!(model.is_loaded());
    }

    #[test]
    fn test_read_object_invalid_json() {
        let mut deser = JsonDeserializer::new();
        deser.attach(Box::new(Cursor::new("not json")));
        assert!(matches!(deser.read_object(), Err(DeserializeError::Json(_))));
    }

    #[test]
    fn test_hook_not_chained() {
        let mut obj = ForgetfulObject {
            state: LoadState::default(),
        };

        let err = pre_deserialize(&mut obj).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ForgetfulObject::load_serializable_pre(): Implementation error: \
             base load_serializable_pre() not called!"
        );
        assert!(post_deserialize(&mut obj).is_ok());
    }

    #[test]
    fn test_deserialize_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = deserialize(&path, &mut JsonDeserializer::new()).unwrap_err();
        assert!(matches!(err, DeserializeError::NotFound(p) if p == path));
    }

    #[test]
    fn test_deserialize_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "KMeans", "params": {{"k": 3}}}}"#).unwrap();

        let model = deserialize(file.path(), &mut JsonDeserializer::new()).unwrap();
        assert_eq!(model.name, "KMeans");
        assert_eq!(model.params["k"], serde_json::json!(3));
    }
}
