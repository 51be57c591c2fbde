//! Blob storage: uploads and public URLs.

use tracing::info;
use uuid::Uuid;

use super::{StoreClient, StoreResult};

/// Random object name keeping the original file extension.
///
/// `photo.PNG` becomes `<uuid>.PNG`; names without an extension get a bare uuid.
pub fn object_path_for(file_name: &str) -> String {
    let id = Uuid::new_v4();
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_plain_extension(ext) => {
            format!("{}.{}", id, ext)
        }
        _ => id.to_string(),
    }
}

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

impl StoreClient {
    /// Public URL of an object in a public bucket.
    pub fn public_url(&self, bucket: &str, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            bucket,
            object_path
        )
    }

    /// Upload bytes under `object_path` and return the object's public URL.
    pub async fn upload_object(
        &self,
        bucket: &str,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StoreResult<String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url(),
            bucket,
            object_path
        );
        let request = self
            .http()
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        let response = self.authorize(request).send().await?;
        Self::check(response).await?;

        info!("Uploaded {}/{}", bucket, object_path);
        Ok(self.public_url(bucket, object_path))
    }
}
