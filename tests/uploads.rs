#![cfg(feature = "inmem-store")]

use actix_web::{test, web, App};
use async_trait::async_trait;
use base64::Engine as _;
use estate_cms::auth::{create_jwt, Role};
use estate_cms::cache::PageCache;
use estate_cms::models::UploadResult;
use estate_cms::repo::inmem::InMemRepo;
use estate_cms::storage::{self, public_id_for, ImageStore, ImageStoreError, StoredImage};
use estate_cms::{config, AppState};
use serde_json::json;
use serial_test::serial;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Simple in-memory mock implementing ImageStore.
#[derive(Default)]
struct MockImageStore {
    inner: Mutex<HashMap<String, Vec<u8>>>,
    fail: bool,
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(&self, folder: &str, bytes: &[u8]) -> Result<StoredImage, ImageStoreError> {
        if self.fail {
            return Err(ImageStoreError::Other("cdn unavailable".into()));
        }
        let public_id = public_id_for(folder, bytes);
        self.inner.lock().unwrap().insert(public_id.clone(), bytes.to_vec());
        Ok(StoredImage { secure_url: format!("https://cdn.test/{public_id}"), public_id })
    }
    async fn delete(&self, public_id: &str) -> Result<(), ImageStoreError> {
        self.inner
            .lock()
            .unwrap()
            .remove(public_id)
            .map(|_| ())
            .ok_or(ImageStoreError::NotFound)
    }
}

// Smallest valid PNG header infer recognizes.
const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R', 0, 0, 0, 1, 0, 0, 0, 1,
];

fn png_data_url() -> String {
    format!("data:image/png;base64,{}", base64::engine::general_purpose::STANDARD.encode(PNG))
}

#[tokio::test]
async fn facade_uploads_inline_payloads() {
    let store = MockImageStore::default();
    let result = storage::upload_inline(&store, &png_data_url(), Some("units")).await;
    assert!(result.success, "{result:?}");
    let public_id = result.public_id.unwrap();
    assert!(public_id.starts_with("units/"));
    assert_eq!(result.secure_url.unwrap(), format!("https://cdn.test/{public_id}"));
    assert_eq!(store.inner.lock().unwrap().get(&public_id).unwrap(), PNG);
}

#[tokio::test]
async fn facade_defaults_folder() {
    let store = MockImageStore::default();
    let result = storage::upload_image(&store, PNG, None).await;
    assert!(result.public_id.unwrap().starts_with(&format!("{}/", storage::DEFAULT_FOLDER)));
}

#[tokio::test]
async fn facade_reports_failures_as_results() {
    let store = MockImageStore::default();
    let bad = storage::upload_inline(&store, "data:image/png;base64,@@@", None).await;
    assert!(!bad.success);
    assert!(bad.error.unwrap().contains("base64"));

    let text = storage::upload_image(&store, b"just some text", None).await;
    assert_eq!(text, UploadResult::failed("unrecognized file type"));

    let empty = storage::upload_image(&store, b"", None).await;
    assert!(!empty.success);

    let failing = MockImageStore { fail: true, ..Default::default() };
    let down = storage::upload_image(&failing, PNG, None).await;
    assert!(!down.success);
    assert!(down.error.unwrap().contains("cdn unavailable"));
    assert!(down.secure_url.is_none() && down.public_id.is_none());
}

#[tokio::test]
async fn delete_removes_stored_object() {
    let store = MockImageStore::default();
    let result = storage::upload_image(&store, PNG, Some("hero-sliders")).await;
    let public_id = result.public_id.unwrap();
    store.delete(&public_id).await.unwrap();
    assert!(matches!(store.delete(&public_id).await, Err(ImageStoreError::NotFound)));
}

#[actix_web::test]
#[serial]
async fn upload_route_accepts_json_and_multipart() {
    std::env::set_var("JWT_SECRET", "test-secret-must-be-32-bytes-long!!");
    let tmp = tempfile::tempdir().unwrap();
    std::env::set_var("ESTATE_DATA_DIR", tmp.path());
    let store = Arc::new(MockImageStore::default());
    let state = AppState::new(Arc::new(InMemRepo::new()), store.clone(), PageCache::default());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(config)).await;
    let token = create_jwt("editor-1", vec![Role::Editor]).unwrap();

    // unauthenticated
    let req = test::TestRequest::post()
        .uri("/api/v1/uploads")
        .set_json(json!({"data": png_data_url()}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/uploads")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"data": png_data_url(), "folder": "promo"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: UploadResult = test::read_body_json(resp).await;
    assert!(body.success);
    assert!(body.public_id.unwrap().starts_with("promo/"));

    let boundary = "XBOUNDARYX";
    let mut payload = Vec::new();
    payload.extend_from_slice(
        format!("--{boundary}\r\nContent-Disposition: form-data; name=\"folder\"\r\n\r\nunits\r\n").as_bytes(),
    );
    payload.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    payload.extend_from_slice(PNG);
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    let req = test::TestRequest::post()
        .uri("/api/v1/uploads")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .insert_header(("Content-Type", format!("multipart/form-data; boundary={boundary}")))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: UploadResult = test::read_body_json(resp).await;
    assert!(body.public_id.unwrap().starts_with("units/"));

    // rejected payloads come back as structured results
    let req = test::TestRequest::post()
        .uri("/api/v1/uploads")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"data": "bm90IGFuIGltYWdl"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: UploadResult = test::read_body_json(resp).await;
    assert!(!body.success);
    assert!(body.error.is_some());
    assert_eq!(store.inner.lock().unwrap().len(), 2, "one object per folder");
}
