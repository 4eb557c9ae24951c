use crate::utils::collections::unique;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stream kinds an operation can target. Attachments are never operated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Video,
    Audio,
    Subtitle,
}

impl StreamType {
    /// ffmpeg stream specifier letter.
    pub fn specifier(&self) -> &'static str {
        match self {
            Self::Video => "v",
            Self::Audio => "a",
            Self::Subtitle => "s",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum OperationKind {
    Copy,
    Convert { codec: String, arguments: Vec<String> },
}

impl OperationKind {
    pub fn convert<T: Into<String>>(codec: T, arguments: Vec<String>) -> Self {
        Self::Convert {
            codec: codec.into(),
            arguments,
        }
    }
}

/// One kept stream and what happens to it. Plan order is output track order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub stream_index: u32,
    pub stream_type: StreamType,
    pub kind: OperationKind,
}

impl Operation {
    pub fn new(stream_index: u32, stream_type: StreamType, kind: OperationKind) -> Self {
        Self {
            stream_index,
            stream_type,
            kind,
        }
    }

    pub fn is_copy(&self) -> bool {
        self.kind == OperationKind::Copy
    }

    /// `-c:<t> copy` or `-c:<t> <codec> <arguments...>`.
    pub fn codec_argument(&self) -> Vec<String> {
        self.codec_argument_with(format!("-c:{}", self.stream_type.specifier()))
    }

    /// Like [`codec_argument`](Self::codec_argument) but addressed to one
    /// output stream of this type: `-c:<t>:<output_index> ...`.
    pub fn codec_argument_for_output(&self, output_index: usize) -> Vec<String> {
        self.codec_argument_with(format!(
            "-c:{}:{}",
            self.stream_type.specifier(),
            output_index
        ))
    }

    fn codec_argument_with(&self, flag: String) -> Vec<String> {
        match &self.kind {
            OperationKind::Copy => vec![flag, "copy".to_string()],
            OperationKind::Convert { codec, arguments } => {
                let mut argument = vec![flag, codec.clone()];
                argument.extend(arguments.iter().cloned());
                argument
            }
        }
    }

    /// `-map 0:<index>`.
    pub fn map_argument(&self) -> Vec<String> {
        vec!["-map".to_string(), format!("0:{}", self.stream_index)]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0:{} ({}): ", self.stream_index, self.stream_type)?;
        match &self.kind {
            OperationKind::Copy => write!(f, "copy"),
            OperationKind::Convert { codec, .. } => write!(f, "transcode to {}", codec),
        }
    }
}

/// All codec groups, then all map groups, with repeated groups dropped
/// (first occurrence wins), flattened.
///
/// Codec flags are per stream type, so two audio streams that are both copied
/// collapse into a single `-c:a copy`. ffmpeg applies the last `-c:<t>` to
/// every stream of that type, so a type whose operations disagree is
/// addressed per output stream instead (`-c:a:0 copy -c:a:1 truehd`).
pub fn ffmpeg_arguments(operations: &[Operation]) -> Vec<String> {
    let mut seen_per_type: HashMap<StreamType, usize> = HashMap::new();
    let codec_groups: Vec<Vec<String>> = operations
        .iter()
        .map(|operation| {
            let output_index = seen_per_type.entry(operation.stream_type).or_insert(0);
            let group = if is_uniform(operations, operation.stream_type) {
                operation.codec_argument()
            } else {
                operation.codec_argument_for_output(*output_index)
            };
            *output_index += 1;
            group
        })
        .collect();

    let groups = codec_groups
        .into_iter()
        .chain(operations.iter().map(Operation::map_argument));

    unique(groups).into_iter().flatten().collect()
}

/// True when every operation on `stream_type` has the same codec handling.
fn is_uniform(operations: &[Operation], stream_type: StreamType) -> bool {
    let mut kinds = operations
        .iter()
        .filter(|operation| operation.stream_type == stream_type)
        .map(|operation| &operation.kind);
    match kinds.next() {
        Some(first) => kinds.all(|kind| kind == first),
        None => true,
    }
}
