//! File rules, operating on the metadata recorded in [`crate::value::File`].

use super::Rule;
use crate::engine::context::Context;
use crate::value::Value;

const IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/svg+xml",
    "image/webp",
];

/// Type rule: the value must be a file list.
pub fn file() -> Box<dyn Rule> {
    Box::new(FileType)
}

struct FileType;

impl Rule for FileType {
    fn name(&self) -> &'static str {
        "file"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        matches!(ctx.value, Value::Files(_))
    }

    fn is_type(&self) -> bool {
        true
    }

    fn expected_type(&self) -> Option<&'static str> {
        Some("file")
    }
}

/// Every file must carry one of the given MIME types.
pub fn mime(types: &[&str]) -> Box<dyn Rule> {
    Box::new(Mime {
        name: "mime",
        types: types.iter().map(|t| (*t).to_string()).collect(),
    })
}

/// Every file must be an image.
pub fn image() -> Box<dyn Rule> {
    Box::new(Mime {
        name: "image",
        types: IMAGE_TYPES.iter().map(|t| (*t).to_string()).collect(),
    })
}

struct Mime {
    name: &'static str,
    types: Vec<String>,
}

impl Rule for Mime {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match ctx.value.as_files() {
            Some(files) => files.iter().all(|f| {
                f.content_type
                    .as_deref()
                    // Ignore parameters such as "; charset=utf-8".
                    .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
                    .is_some_and(|ct| self.types.iter().any(|t| t == ct))
            }),
            None => false,
        }
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        vec![(":values".to_string(), self.types.join(", "))]
    }
}

/// Every file name must end with one of the given extensions (without the
/// leading dot).
pub fn extension(extensions: &[&str]) -> Box<dyn Rule> {
    Box::new(Extension {
        extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
    })
}

struct Extension {
    extensions: Vec<String>,
}

impl Rule for Extension {
    fn name(&self) -> &'static str {
        "extension"
    }

    fn validate(&self, ctx: &mut Context) -> bool {
        match ctx.value.as_files() {
            Some(files) => files.iter().all(|f| {
                self.extensions
                    .iter()
                    .any(|ext| f.name.to_ascii_lowercase().ends_with(&format!(".{ext}")))
            }),
            None => false,
        }
    }

    fn message_placeholders(&self, _ctx: &Context) -> Vec<(String, String)> {
        vec![(":values".to_string(), self.extensions.join(", "))]
    }
}
