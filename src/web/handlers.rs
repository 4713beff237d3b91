use actix_multipart::Multipart;
use actix_web::{http::StatusCode, web, HttpResponse};
use futures::StreamExt;
use serde::Serialize;

use crate::analysis::{catalog, AnalysisKind};
use crate::dashboard::LoadState;
use crate::error::DashboardError;
use crate::io;

use super::state::AppState;

// ---------------------------------------------------------------------------
// Error wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    details: String,
}

#[derive(Debug)]
pub(crate) struct WebError(DashboardError);

impl From<DashboardError> for WebError {
    fn from(e: DashboardError) -> Self {
        WebError(e)
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DashboardError::ParseError(_)
            | DashboardError::UnknownAnalysis(_)
            | DashboardError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            DashboardError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            details: self.0.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Form parsing
// ---------------------------------------------------------------------------

/// The fields of one dashboard submission.
#[derive(Debug, Default)]
struct DashboardForm {
    /// Table name and raw bytes of the uploaded file, if any.
    upload: Option<(String, Vec<u8>)>,
    analyses: Vec<String>,
}

async fn read_form(mut payload: Multipart, limit: usize) -> Result<DashboardForm, DashboardError> {
    let mut form = DashboardForm::default();
    let mut received = 0usize;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| DashboardError::ParseError(format!("Malformed form data: {e}")))?;
        let field_name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|s| s.to_string()));

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| DashboardError::ParseError(format!("Malformed form data: {e}")))?;
            received += chunk.len();
            if received > limit {
                return Err(DashboardError::PayloadTooLarge(format!(
                    "upload exceeds {limit} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match field_name.as_str() {
            "file" => {
                let filename = filename.unwrap_or_default();
                // A file input left blank still submits an empty part.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                let name = io::upload_name(&filename)?;
                form.upload = Some((name, bytes));
            }
            "analysis" => {
                let value = String::from_utf8_lossy(&bytes).trim().to_string();
                if !value.is_empty() {
                    form.analyses.push(value);
                }
            }
            other => tracing::debug!(field = other, "ignoring form field"),
        }
    }

    Ok(form)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Render the dashboard for one submission: an optional CSV file plus the
/// selected analysis names, in order.
pub async fn dashboard(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, WebError> {
    let form = read_form(payload, state.max_upload_bytes()).await?;
    let selections = AnalysisKind::parse_selection(&form.analyses)?;

    let load = match form.upload {
        Some((name, bytes)) => {
            tracing::info!(table = %name, bytes = bytes.len(), "received upload");
            LoadState::from_result(state.load(&bytes, &name))
        }
        None => LoadState::Empty,
    };

    Ok(HttpResponse::Ok().json(state.dashboard.render(&load, &selections)))
}

pub async fn catalog_json() -> HttpResponse {
    HttpResponse::Ok().json(catalog())
}

pub async fn index_html() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../../static/index.html"))
}

pub async fn app_js() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(include_str!("../../static/app.js"))
}

pub async fn style_css() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .body(include_str!("../../static/style.css"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use actix_web::http::header;
    use actix_web::test as actix_test;
    use actix_web::App;

    const ORDERS: &str = "Order_ID,Traffic,Area,Delivery_Time\n\
                          1,Low,Urban,10\n\
                          2,High,Urban,20\n\
                          3,Low,Metropolitian,30\n";

    const BOUNDARY: &str = "dashboard-test-boundary";

    fn multipart_body(file: Option<(&str, &str)>, analyses: &[&str]) -> Vec<u8> {
        let mut body = String::new();
        if let Some((filename, content)) = file {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
            ));
        }
        for analysis in analyses {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"analysis\"\r\n\r\n{analysis}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body.into_bytes()
    }

    fn post_dashboard(body: Vec<u8>) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/dashboard")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(body)
    }

    fn make_app(
        state: AppState,
    ) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .route("/", web::get().to(index_html))
            .route("/api/catalog", web::get().to(catalog_json))
            .route("/api/dashboard", web::post().to(dashboard))
    }

    // -----------------------------------------------------------------------
    // Dashboard endpoint
    // -----------------------------------------------------------------------

    #[actix_web::test]
    async fn test_dashboard_without_upload_prompts() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let resp = actix_test::call_service(&app, post_dashboard(multipart_body(None, &[])).to_request()).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["title"], "Logistics Data Analysis Dashboard");
        assert_eq!(body["body"]["state"], "prompt");
        assert!(body["error"].is_null());
    }

    #[actix_web::test]
    async fn test_dashboard_runs_selected_analyses() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let body = multipart_body(
            Some(("orders.csv", ORDERS)),
            &["Total Orders Count", "Orders by Traffic Condition"],
        );
        let resp = actix_test::call_service(&app, post_dashboard(body).to_request()).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["body"]["state"], "loaded");
        assert_eq!(body["body"]["total_records"], 3);
        let sections = body["body"]["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["heading"], "Total Orders");
        assert_eq!(sections[0]["artifacts"][0]["display"], "3");
        assert_eq!(sections[1]["artifacts"][0]["type"], "chart");
        assert_eq!(sections[1]["artifacts"][0]["kind"], "bar");
        assert_eq!(sections[1]["artifacts"][0]["categories"][0], "Low");
        assert_eq!(sections[1]["artifacts"][0]["values"][0], 2.0);
    }

    #[actix_web::test]
    async fn test_dashboard_missing_column_warning() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let body = multipart_body(Some(("orders.csv", ORDERS)), &["Orders by Weather"]);
        let resp = actix_test::call_service(&app, post_dashboard(body).to_request()).await;
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        let artifact = &body["body"]["sections"][0]["artifacts"][0];
        assert_eq!(artifact["type"], "warning");
        assert_eq!(artifact["message"], "Weather column not found in the dataset");
    }

    #[actix_web::test]
    async fn test_dashboard_malformed_csv_reports_error() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let body = multipart_body(Some(("broken.csv", "a,b\n1,2,3,4\n")), &["Show Schema"]);
        let resp = actix_test::call_service(&app, post_dashboard(body).to_request()).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error loading data: "));
        assert_eq!(body["body"]["state"], "prompt");
    }

    #[actix_web::test]
    async fn test_dashboard_unknown_analysis() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let body = multipart_body(Some(("orders.csv", ORDERS)), &["Orders by Moon Phase"]);
        let resp = actix_test::call_service(&app, post_dashboard(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Bad Request");
        assert!(body["details"].as_str().unwrap().contains("Orders by Moon Phase"));
    }

    #[actix_web::test]
    async fn test_dashboard_rejects_non_csv() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let body = multipart_body(Some(("orders.xlsx", "not a csv")), &[]);
        let resp = actix_test::call_service(&app, post_dashboard(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_dashboard_upload_too_large() {
        let config = DashboardConfig {
            server: crate::config::ServerConfig {
                max_upload_bytes: 16,
                ..Default::default()
            },
            ..DashboardConfig::default()
        };
        let app = actix_test::init_service(make_app(AppState::new(config))).await;
        let body = multipart_body(Some(("orders.csv", ORDERS)), &[]);
        let resp = actix_test::call_service(&app, post_dashboard(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    // -----------------------------------------------------------------------
    // Catalog and static files
    // -----------------------------------------------------------------------

    #[actix_web::test]
    async fn test_catalog_lists_all_analyses() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::get().uri("/api/catalog").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[0]["name"], "Show Schema");
    }

    #[actix_web::test]
    async fn test_index_html() {
        let app = actix_test::init_service(make_app(AppState::default())).await;
        let req = actix_test::TestRequest::get().uri("/").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = actix_test::read_body(resp).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Logistics Data Analysis Dashboard"));
    }
}
