use crate::analysis::grouper::{serialize_groups, DuplicateGroup, DuplicateReport};
use crate::error::Error;
use crate::storage::models::{FolderDescriptor, MatchOptions};
use serde::{Deserialize, Serialize};

/// Requests accepted by the background dispatcher, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    OpenCleanerTab,
    GetFolders,
    FindDuplicates {
        #[serde(default)]
        options: MatchOptions,
    },
    RemoveSelected {
        #[serde(rename = "bookmarkIds")]
        bookmark_ids: Vec<String>,
    },
}

impl Request {
    pub const ACTIONS: [&'static str; 4] = [
        "openCleanerTab",
        "getFolders",
        "findDuplicates",
        "removeSelected",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldersResponse {
    pub success: bool,
    pub folders: Vec<FolderDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatesResponse {
    pub success: bool,
    #[serde(serialize_with = "serialize_groups")]
    pub duplicates: Vec<DuplicateGroup>,
    pub count: usize,
    pub total_duplicates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveResponse {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Ack(AckResponse),
    Folders(FoldersResponse),
    Duplicates(DuplicatesResponse),
    Removed(RemoveResponse),
}

impl Response {
    pub fn ok() -> Self {
        Response::Ack(AckResponse {
            success: true,
            error: None,
        })
    }

    /// Structured failure for requests that never reached a handler.
    pub fn failure(err: &Error) -> Self {
        Response::Ack(AckResponse {
            success: false,
            error: Some(err.to_string()),
        })
    }

    pub fn folders(result: Result<Vec<FolderDescriptor>, Error>) -> Self {
        Response::Folders(match result {
            Ok(folders) => FoldersResponse {
                success: true,
                folders,
                error: None,
            },
            Err(e) => FoldersResponse {
                success: false,
                folders: Vec::new(),
                error: Some(e.to_string()),
            },
        })
    }

    pub fn duplicates(result: Result<DuplicateReport, Error>) -> Self {
        Response::Duplicates(match result {
            Ok(report) => DuplicatesResponse {
                success: true,
                count: report.count(),
                total_duplicates: report.total_duplicates(),
                message: report.message,
                duplicates: report.groups,
                error: None,
            },
            Err(e) => DuplicatesResponse {
                success: false,
                duplicates: Vec::new(),
                count: 0,
                total_duplicates: 0,
                message: None,
                error: Some(e.to_string()),
            },
        })
    }

    pub fn removed(result: Result<usize, Error>) -> Self {
        Response::Removed(match result {
            Ok(count) => RemoveResponse {
                success: true,
                count,
                error: None,
            },
            Err(e) => RemoveResponse {
                success: false,
                count: 0,
                error: Some(e.to_string()),
            },
        })
    }

    pub fn is_success(&self) -> bool {
        match self {
            Response::Ack(r) => r.success,
            Response::Folders(r) => r.success,
            Response::Duplicates(r) => r.success,
            Response::Removed(r) => r.success,
        }
    }
}

/// Parse a raw message, telling unknown actions apart from malformed ones.
pub fn parse_request(raw: &str) -> Result<Request, Error> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| Error::InvalidRequest(e.to_string()))?;

    let action = value
        .get("action")
        .and_then(|a| a.as_str())
        .ok_or_else(|| Error::InvalidRequest("missing action".to_string()))?;

    if !Request::ACTIONS.contains(&action) {
        return Err(Error::UnknownAction(action.to_string()));
    }

    serde_json::from_value(value).map_err(|e| Error::InvalidRequest(e.to_string()))
}
