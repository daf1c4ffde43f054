use super::auth::authorize;
use super::staging::{has_xlsx_extension, stage_field, StagedUpload};
use crate::error::AppError;
use crate::ingest;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::responses::UploadSummary;
use futures_util::StreamExt;
use log::info;
use uuid::Uuid;

/// HTTP handler wrapper that converts the ingest result into a response.
///
/// - `200 OK` with `{message, rowsProcessed}` on success.
/// - `401` for a missing or wrong bearer token, checked before the body is read.
/// - `400` for a missing `file` field, a non-`.xlsx` filename or unusable rows.
/// - `413` when the file exceeds the configured size limit.
/// - `500` when the workbook cannot be read or the store fails.
pub(crate) async fn process(
    req: HttpRequest,
    payload: Multipart,
    state: web::Data<AppState>,
) -> impl Responder {
    match upload_spreadsheet(&req, payload, &state).await {
        Ok(rows_processed) => HttpResponse::Ok().json(UploadSummary {
            message: "Data uploaded successfully".to_string(),
            rows_processed,
        }),
        Err(e) => e.respond("Error processing file"),
    }
}

/// Authenticates, stages the `file` field, then parses it and replaces the
/// stored dataset on the blocking pool. Returns the number of rows ingested.
async fn upload_spreadsheet(
    req: &HttpRequest,
    mut payload: Multipart,
    state: &AppState,
) -> Result<usize, AppError> {
    authorize(req, state.config.api_secret_key.as_deref())?;

    let upload_id = Uuid::new_v4();
    let mut staged: Option<StagedUpload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("file") if staged.is_none() => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();

                if !has_xlsx_extension(&filename) {
                    return Err(AppError::BadRequest(
                        "Only Excel (.xlsx) files are allowed".to_string(),
                    ));
                }

                let upload = stage_field(
                    &mut field,
                    &state.config.temp_dir,
                    &filename,
                    state.config.max_upload_bytes,
                )
                .await?;
                info!(
                    "Upload {}: staged '{}' ({} bytes, md5 {})",
                    upload_id, filename, upload.size, upload.md5
                );
                staged = Some(upload);
            }
            _ => {}
        }
    }

    let staged = staged.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let store = state.store.clone();
    let path = staged.path().to_path_buf();
    let md5 = staged.md5.clone();
    let outcome = web::block(move || ingest::ingest_file(&store, &path, &md5)).await;
    staged.remove();

    let rows = outcome??;
    info!("Upload {}: processed {} rows", upload_id, rows);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use crate::services;
    use crate::test_support::{
        multipart_body, staged_files, test_state, workbook_bytes, SheetRow,
    };
    use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use common::model::cafe::CafeRecord;
    use common::model::insights::InsightsSnapshot;
    use common::responses::{ErrorBody, UploadSummary};
    use std::sync::Arc;

    const SECRET: &str = "s3cret";

    fn upload_request(
        token: Option<&str>,
        field: &str,
        filename: Option<&str>,
        content: &[u8],
    ) -> test::TestRequest {
        let (content_type, body) = multipart_body(field, filename, content);
        let mut req = test::TestRequest::post()
            .uri("/api/upload")
            .insert_header((CONTENT_TYPE, content_type))
            .set_payload(body);
        if let Some(token) = token {
            req = req.insert_header((AUTHORIZATION, format!("Bearer {}", token)));
        }
        req
    }

    fn three_cafes() -> Vec<u8> {
        workbook_bytes(&[
            SheetRow::new("A", "X", 10.0, 1.0, 2.0),
            SheetRow::new("B", "Y", 20.0, 2.0, 3.0),
            SheetRow::new("C", "Z", 5.0, 0.0, 1.0),
        ])
    }

    #[actix_web::test]
    async fn upload_then_read_back_ranked_cafes_and_totals() {
        let (state, _dir) = test_state(Some(SECRET));
        let temp_dir = state.config.temp_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = upload_request(Some(SECRET), "file", Some("march.xlsx"), &three_cafes()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let summary: UploadSummary = test::read_body_json(resp).await;
        assert_eq!(summary.rows_processed, 3);
        assert_eq!(summary.message, "Data uploaded successfully");

        let req = test::TestRequest::get().uri("/api/cafes").to_request();
        let cafes: Vec<CafeRecord> = test::call_and_read_body_json(&app, req).await;
        let ranked: Vec<_> = cafes
            .iter()
            .map(|c| (c.name.as_str(), c.location.as_str(), c.cups_recycled))
            .collect();
        assert_eq!(ranked, [("B", "Y", 20), ("A", "X", 10), ("C", "Z", 5)]);
        assert!(cafes.iter().all(|c| c.recycling_rate == 0.0
            && c.trend == 0.0
            && c.waste_reduction == 0.0
            && c.compost_produced == 0.0
            && c.contamination_rate == 0.0
            && c.website.is_empty()
            && c.rank == 0));

        let req = test::TestRequest::get().uri("/api/insights").to_request();
        let insights: InsightsSnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(insights.cups_recycled, 35);
        assert_eq!(insights.co2_saved, 3.0);
        assert_eq!(insights.waste_diverted, 6.0);
        assert!(insights.source_md5.is_some());

        assert_eq!(staged_files(&temp_dir), 0);
    }

    #[actix_web::test]
    async fn uploading_the_same_sheet_twice_replaces_rather_than_merges() {
        let (state, _dir) = test_state(Some(SECRET));
        let store = state.store.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        for _ in 0..2 {
            let req = upload_request(Some(SECRET), "file", Some("march.xlsx"), &three_cafes()).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let names: Vec<_> = store.list_cafes().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[actix_web::test]
    async fn wrong_or_missing_token_leaves_the_store_untouched() {
        let (state, _dir) = test_state(Some(SECRET));
        let store = state.store.clone();
        let temp_dir = state.config.temp_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = upload_request(Some(SECRET), "file", Some("march.xlsx"), &three_cafes()).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let before = store.list_cafes().unwrap();

        let replacement = workbook_bytes(&[SheetRow::new("Intruder", "Q", 999.0, 9.0, 9.0)]);
        for token in [Some("guess"), None] {
            let req = upload_request(token, "file", Some("evil.xlsx"), &replacement).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: ErrorBody = test::read_body_json(resp).await;
            assert_eq!(body.error, "Unauthorized");
        }

        assert_eq!(store.list_cafes().unwrap(), before);
        assert_eq!(staged_files(&temp_dir), 0);
    }

    #[actix_web::test]
    async fn non_xlsx_filename_is_rejected_without_staging() {
        let (state, _dir) = test_state(Some(SECRET));
        let temp_dir = state.config.temp_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = upload_request(Some(SECRET), "file", Some("march.csv"), b"name,location\n").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Only Excel (.xlsx) files are allowed");
        assert_eq!(staged_files(&temp_dir), 0);
    }

    #[actix_web::test]
    async fn form_without_a_file_field_is_a_bad_request() {
        let (state, _dir) = test_state(Some(SECRET));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = upload_request(Some(SECRET), "note", None, b"hello").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "No file uploaded");
    }

    #[actix_web::test]
    async fn invalid_rows_fail_the_whole_upload() {
        let (state, _dir) = test_state(Some(SECRET));
        let store = state.store.clone();
        let temp_dir = state.config.temp_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = upload_request(Some(SECRET), "file", Some("march.xlsx"), &three_cafes()).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let broken = workbook_bytes(&[
            SheetRow::new("D", "W", 4.0, 1.0, 1.0),
            SheetRow::new("E", "V", 2.5, 1.0, 1.0),
        ]);
        let req = upload_request(Some(SECRET), "file", Some("april.xlsx"), &broken).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Invalid Excel data format");
        assert_eq!(
            body.details.as_deref(),
            Some("row 3: 'cupsRecycled' must be a non-negative whole number")
        );

        assert_eq!(store.list_cafes().unwrap().len(), 3);
        assert_eq!(staged_files(&temp_dir), 0);
    }

    #[actix_web::test]
    async fn unreadable_workbook_is_a_server_error_without_internal_detail() {
        let (state, _dir) = test_state(Some(SECRET));
        let temp_dir = state.config.temp_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = upload_request(Some(SECRET), "file", Some("march.xlsx"), b"definitely not a zip").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Error processing file");
        assert_eq!(body.details.as_deref(), Some("The spreadsheet could not be read"));
        assert_eq!(staged_files(&temp_dir), 0);
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected_and_removed() {
        let (mut state, _dir) = test_state(Some(SECRET));
        Arc::make_mut(&mut state.config).max_upload_bytes = 64;
        let temp_dir = state.config.temp_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(services::configure),
        )
        .await;

        let req = upload_request(Some(SECRET), "file", Some("march.xlsx"), &three_cafes()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(staged_files(&temp_dir), 0);
    }
}
