use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::constants::{MAX_PLAYER_CODE_ATTEMPTS, UPLOADS_BUCKET};
use crate::core::storage::{
    generate_player_code, generate_upload_id, resolve_media_type, stored_file_name, SignageStore, StorageError,
    StorageResult, UploadRequest,
};
use crate::state::{CanvasRecord, CanvasSummary, LayoutEncoding, MediaFile, Player, TimelineItem};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote store backed by a Supabase project: PostgREST tables plus the
/// `uploads` storage bucket.
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    key: String,
}

/// Row of `timeline_items`.
#[derive(Debug, Serialize)]
struct TimelineRow<'a> {
    id: &'a str,
    canvas_id: &'a str,
    file_id: &'a str,
    order: i64,
    duration_seconds: f64,
    meta: Value,
}

#[derive(Debug, serde::Deserialize)]
struct CanvasRow {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    layout: Option<LayoutEncoding>,
}

impl SupabaseStore {
    pub fn new(base_url: &str, key: &str) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            UPLOADS_BUCKET,
            urlencoding::encode(file_name)
        )
    }

    pub fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            UPLOADS_BUCKET,
            urlencoding::encode(file_name)
        )
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> StorageResult<Vec<T>> {
        let response = self
            .request(Method::GET, self.table_url(table))
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }

    async fn insert<B: Serialize + ?Sized>(&self, table: &str, body: &B, prefer: &str) -> StorageResult<Response> {
        let response = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }

    async fn delete_where(&self, table: &str, column: &str, value: &str) -> StorageResult<()> {
        let response = self
            .request(Method::DELETE, self.table_url(table))
            .query(&[(column, format!("eq.{value}"))])
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    async fn find_player(&self, code: &str) -> StorageResult<Option<Player>> {
        let rows: Vec<Player> = self
            .select(
                "players",
                &[("select", "*".into()), ("code", format!("eq.{code}")), ("limit", "1".into())],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Pick a code not used yet; gives up checking after a few collisions.
    async fn unused_player_code(&self) -> String {
        let mut code = generate_player_code();
        for _ in 0..MAX_PLAYER_CODE_ATTEMPTS {
            let existing: StorageResult<Vec<Value>> = self
                .select(
                    "players",
                    &[("select", "code".into()), ("code", format!("eq.{code}")), ("limit", "1".into())],
                )
                .await;
            match existing {
                Ok(rows) if rows.is_empty() => break,
                Ok(_) => code = generate_player_code(),
                Err(err) => {
                    tracing::warn!(error = %err, "Player code check failed");
                    break;
                }
            }
        }
        code
    }

    async fn insert_player(&self, row: Value) -> StorageResult<Player> {
        let response = self.insert("players", &[row], "return=representation").await?;
        let mut players: Vec<Player> = response.json().await?;
        players
            .pop()
            .ok_or_else(|| StorageError::Rejected {
                status: StatusCode::OK.as_u16(),
                message: "insert returned no row".into(),
            })
    }
}

/// Integer-typed `code` columns reject the string form.
fn is_integer_column_error(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("bigint")
        || lower.contains("int8")
        || lower.contains("invalid input syntax")
        || (lower.contains("column") && (lower.contains("of type integer") || lower.contains("of type bigint")))
}

async fn check_status(response: Response) -> StorageResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|payload| payload.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);
    Err(StorageError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> StorageResult<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl SignageStore for SupabaseStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn list_files(&self) -> StorageResult<Vec<MediaFile>> {
        self.select("files", &[("select", "*".into()), ("order", "id.desc".into())])
            .await
    }

    async fn list_players(&self) -> StorageResult<Vec<Player>> {
        let ordered = self
            .select("players", &[("select", "*".into()), ("order", "created_at.desc".into())])
            .await;
        match ordered {
            Ok(players) => Ok(players),
            Err(err) => {
                tracing::warn!(error = %err, "Ordered player select failed; retrying unordered");
                self.select("players", &[("select", "*".into())]).await
            }
        }
    }

    async fn create_player(&self) -> StorageResult<Player> {
        let code = self.unused_player_code().await;
        let name = format!("Player {code}");
        let row = json!({ "code": code, "name": name, "files": [] });

        match self.insert_player(row).await {
            Ok(player) => Ok(player),
            Err(StorageError::Rejected { message, .. }) if is_integer_column_error(&message) => {
                let numeric: u64 = code
                    .parse()
                    .map_err(|_| StorageError::Validation(format!("player code {code} is not numeric")))?;
                tracing::info!(code = %code, "Retrying player insert with numeric code");
                self.insert_player(json!({ "code": numeric, "name": name, "files": [] }))
                    .await
            }
            Err(err) => Err(err),
        }
    }

    async fn set_player_files(&self, code: &str, files: Vec<String>) -> StorageResult<Player> {
        if self.find_player(code).await?.is_none() {
            return Err(StorageError::not_found("player", code));
        }
        let response = self
            .request(Method::PATCH, self.table_url("players"))
            .query(&[("code", format!("eq.{code}"))])
            .json(&json!({ "files": files }))
            .send()
            .await?;
        check_status(response).await?;
        self.find_player(code)
            .await?
            .ok_or_else(|| StorageError::not_found("player", code))
    }

    async fn get_canvas(&self, id: &str) -> StorageResult<CanvasRecord> {
        let rows: Vec<CanvasRow> = self
            .select(
                "canvases",
                &[("select", "*".into()), ("id", format!("eq.{id}")), ("limit", "1".into())],
            )
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::not_found("canvas", id))?;

        let timeline: Vec<TimelineItem> = self
            .select(
                "timeline_items",
                &[
                    ("select", "*".into()),
                    ("canvas_id", format!("eq.{id}")),
                    ("order", "order.asc".into()),
                ],
            )
            .await?;

        Ok(CanvasRecord {
            id: row.id,
            name: row.name.unwrap_or_default(),
            layout: row.layout.unwrap_or_default(),
            timeline,
        })
    }

    async fn list_canvases(&self) -> StorageResult<Vec<CanvasSummary>> {
        self.select("canvases", &[("select", "id,name".into())]).await
    }

    async fn upsert_canvas(&self, record: &CanvasRecord) -> StorageResult<String> {
        if record.id.trim().is_empty() || record.name.trim().is_empty() {
            return Err(StorageError::Validation("id and name required".into()));
        }
        let canvas = json!({ "id": record.id, "name": record.name, "layout": record.layout });
        self.insert("canvases", &[canvas], "resolution=merge-duplicates,return=minimal")
            .await?;

        // Replace-all: drop every stored row, then insert the current list.
        self.delete_where("timeline_items", "canvas_id", &record.id).await?;
        let rows: Vec<TimelineRow> = record
            .timeline
            .iter()
            .enumerate()
            .map(|(order, item)| TimelineRow {
                id: &item.id,
                canvas_id: &record.id,
                file_id: &item.file_id,
                order: order as i64,
                duration_seconds: item.effective_duration_seconds(),
                meta: json!({}),
            })
            .collect();
        if !rows.is_empty() {
            self.insert("timeline_items", &rows, "return=minimal").await?;
        }
        tracing::info!(canvas_id = %record.id, items = rows.len(), "Canvas saved remotely");
        Ok(record.id.clone())
    }

    async fn delete_canvas(&self, id: &str) -> StorageResult<()> {
        self.delete_where("timeline_items", "canvas_id", id).await?;
        self.delete_where("canvases", "id", id).await
    }

    async fn upload_file(&self, request: UploadRequest) -> StorageResult<MediaFile> {
        let name = request.display_name();
        let mime_type = resolve_media_type(request.mime_type.as_deref(), &name)?;
        let id = generate_upload_id();
        let file_name = stored_file_name(&id, &name);

        let response = self
            .request(Method::POST, self.object_url(&file_name))
            .header(reqwest::header::CONTENT_TYPE, mime_type.as_str())
            .body(request.bytes)
            .send()
            .await?;
        check_status(response).await?;

        let file = MediaFile {
            id,
            name,
            mime_type,
            url: self.public_url(&file_name),
        };

        // Metadata row is optional; the object upload already succeeded.
        if let Err(err) = self.insert("files", &[&file], "return=minimal").await {
            tracing::warn!(error = %err, id = %file.id, "Could not record file metadata");
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_column_detection() {
        assert!(is_integer_column_error("invalid input syntax for type bigint: \"12a\""));
        assert!(is_integer_column_error("column \"code\" is of type integer but expression is of type text"));
        assert!(!is_integer_column_error("duplicate key value violates unique constraint"));
    }

    #[test]
    fn test_urls() {
        let store = SupabaseStore::new("https://demo.supabase.co/", "key").unwrap();
        assert_eq!(store.table_url("players"), "https://demo.supabase.co/rest/v1/players");
        assert_eq!(
            store.public_url("1700.mp4"),
            "https://demo.supabase.co/storage/v1/object/public/uploads/1700.mp4"
        );
    }

    #[test]
    fn test_timeline_row_shape() {
        let row = TimelineRow {
            id: "a",
            canvas_id: "c1",
            file_id: "f1",
            order: 0,
            duration_seconds: 7.0,
            meta: json!({}),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["file_id"], "f1");
        assert_eq!(value["canvas_id"], "c1");
        assert_eq!(value["duration_seconds"], 7.0);
    }

    #[test]
    fn test_canvas_row_accepts_both_layouts() {
        let legacy: CanvasRow = serde_json::from_str(r#"{"id":"c","name":"n","layout":[]}"#).unwrap();
        assert!(matches!(legacy.layout, Some(LayoutEncoding::Array(_))));
        let sized: CanvasRow =
            serde_json::from_str(r#"{"id":"c","layout":{"width":800,"height":600,"elements":[]}}"#).unwrap();
        assert!(matches!(sized.layout, Some(LayoutEncoding::Sized { width: Some(800), .. })));
    }
}
