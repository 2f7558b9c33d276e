//! `/api/file-manager`: per-user file tree and share links.

use serde_json::{json, Value};

use super::{spread, DEFAULT_PATH};
use crate::error::ApiError;
use crate::http::MultipartForm;
use crate::requester::{with_query, Call, Requester};
use crate::types::FileUpload;
use crate::validate;

const FILE_MANAGER_ENDPOINT: &str = "/api/file-manager";
const UPLOAD_ENDPOINT: &str = "/api/file-manager/upload";
const DOWNLOAD_ENDPOINT: &str = "/api/file-manager/download";
const REMOVE_ENDPOINT: &str = "/api/file-manager/remove";
const CREATE_FOLDER_ENDPOINT: &str = "/api/file-manager/create-folder";
const SHARE_ENDPOINT: &str = "/api/file-manager/share";

#[derive(Debug, Clone, Copy)]
pub struct FileManagerApi<'a> {
    requester: &'a Requester,
}

impl<'a> FileManagerApi<'a> {
    pub(crate) fn new(requester: &'a Requester) -> Self {
        Self { requester }
    }

    /// List a user's files. `options` (e.g. `path`, `search`) follow
    /// `username` in the query string.
    pub async fn list_files(
        &self,
        username: &str,
        options: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        self.requester.send(list_files_call(username, options)?).await
    }

    /// Upload `file` into `path` (`/` when `None`) as multipart form data.
    pub async fn upload_file(
        &self,
        username: &str,
        file: FileUpload,
        path: Option<&str>,
    ) -> Result<Value, ApiError> {
        let call = upload_file_call(username, file, path.unwrap_or(DEFAULT_PATH))?
            .header("Authorization", format!("Bearer {}", self.requester.credential()));
        self.requester.send(call).await
    }

    pub async fn download_file(&self, username: &str, file_path: &str) -> Result<Value, ApiError> {
        self.requester.send(download_file_call(username, file_path)?).await
    }

    pub async fn remove_file(&self, username: &str, file_path: &str) -> Result<Value, ApiError> {
        self.requester.send(remove_file_call(username, file_path)?).await
    }

    /// Create `folder_name` under `parent_path` (`/` when `None`).
    pub async fn create_folder(
        &self,
        username: &str,
        folder_name: &str,
        parent_path: Option<&str>,
    ) -> Result<Value, ApiError> {
        let call = create_folder_call(username, folder_name, parent_path.unwrap_or(DEFAULT_PATH))?;
        self.requester.send(call).await
    }

    /// Ask the server for a share link to `file_name`.
    pub async fn share_file(&self, file_name: &str) -> Result<Value, ApiError> {
        self.requester.send(share_file_call(file_name)?).await
    }

    /// Resolve a share link. With `metadata` set the server returns only the
    /// file's metadata.
    pub async fn get_shared_file(
        &self,
        code: &str,
        data: &str,
        metadata: bool,
    ) -> Result<Value, ApiError> {
        self.requester.send(get_shared_file_call(code, data, metadata)?).await
    }
}

fn list_files_call(username: &str, options: &[(&str, &str)]) -> Result<Call, ApiError> {
    validate::non_empty("username", username)?;
    let pairs = spread(&[("username", username)], options);
    Ok(Call::get(with_query(FILE_MANAGER_ENDPOINT, pairs)))
}

fn upload_file_call(username: &str, file: FileUpload, path: &str) -> Result<Call, ApiError> {
    validate::non_empty("username", username)?;
    validate::file(&file)?;
    validate::path("path", path)?;

    let form = MultipartForm::new("file", file)
        .text("path", path)
        .text("username", username);
    Ok(Call::post_multipart(UPLOAD_ENDPOINT, form))
}

fn file_query(endpoint: &str, username: &str, file_path: &str) -> Result<String, ApiError> {
    validate::non_empty("username", username)?;
    validate::path("filePath", file_path)?;
    Ok(with_query(endpoint, [("username", username), ("path", file_path)]))
}

fn download_file_call(username: &str, file_path: &str) -> Result<Call, ApiError> {
    Ok(Call::get(file_query(DOWNLOAD_ENDPOINT, username, file_path)?))
}

fn remove_file_call(username: &str, file_path: &str) -> Result<Call, ApiError> {
    Ok(Call::delete(file_query(REMOVE_ENDPOINT, username, file_path)?))
}

fn create_folder_call(
    username: &str,
    folder_name: &str,
    parent_path: &str,
) -> Result<Call, ApiError> {
    validate::non_empty("username", username)?;
    validate::non_empty("folderName", folder_name)?;
    validate::path("parentPath", parent_path)?;
    Ok(Call::post_json(
        CREATE_FOLDER_ENDPOINT,
        &json!({ "username": username, "folderName": folder_name, "parentPath": parent_path }),
    ))
}

fn share_file_call(file_name: &str) -> Result<Call, ApiError> {
    validate::non_empty("fileName", file_name)?;
    Ok(Call::post_json(SHARE_ENDPOINT, &json!({ "fileName": file_name })))
}

fn get_shared_file_call(code: &str, data: &str, metadata: bool) -> Result<Call, ApiError> {
    validate::non_empty("code", code)?;
    validate::non_empty("data", data)?;
    let metadata = if metadata { "true" } else { "false" };
    Ok(Call::get(with_query(
        SHARE_ENDPOINT,
        [("code", code), ("data", data), ("metadata", metadata)],
    )))
}
