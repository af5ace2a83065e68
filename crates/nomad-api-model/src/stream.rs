// Frames of the client file and log streaming endpoints

use serde::{Deserialize, Serialize};

use crate::codec::base64_bytes;

pub const FILE_EVENT_DELETED: &str = "file deleted";
pub const FILE_EVENT_TRUNCATED: &str = "file truncated";

/// One frame of a streamed file or log. `{}` on the wire is a heartbeat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StreamFrame {
    /// Offset of the end of this frame's data within the file
    pub offset: i64,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub file: String,
    pub file_event: String,
}

impl StreamFrame {
    pub fn is_heartbeat(&self) -> bool {
        self.data.is_empty() && self.file_event.is_empty() && self.file.is_empty()
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}
