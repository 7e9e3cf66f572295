use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;

use log::info;

use crate::display::Report;
use crate::parser::{build_classes, read_csv_catalog, CatalogError, CatalogFile};
use crate::schedule::{CourseClass, SearchLimits, SolveOutcome, Solver};

/// Most recently uploaded catalog and the result of solving it
pub struct AppState {
    pub classes: Mutex<Option<Vec<CourseClass>>>,
    pub outcome: Mutex<Option<SolveOutcome>>,
    pub time_limit: Option<Duration>,
}

#[derive(Serialize)]
struct CatalogResponse<'a> {
    classes: &'a [CourseClass],
}

fn error_response(status: actix_web::http::StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({"success": false, "error": message}))
}

/// Solves on the blocking pool so the search does not stall the workers
async fn solve_blocking(
    classes: Vec<CourseClass>,
    time_limit: Option<Duration>,
) -> Result<std::result::Result<SolveOutcome, CatalogError>> {
    let outcome = web::block(move || {
        let solver = Solver::new(classes)?;
        let mut limits = SearchLimits::new();
        if let Some(limit) = time_limit {
            limits = limits.with_time_limit(limit);
        }
        Ok::<_, CatalogError>(solver.solve_with(&limits))
    })
    .await?;
    Ok(outcome)
}

// Solve a JSON catalog sent in the request body, without storing it
async fn solve(body: web::Json<CatalogFile>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let classes = match build_classes(body.into_inner().classes) {
        Ok(classes) => classes,
        Err(e) => return Ok(error_response(actix_web::http::StatusCode::BAD_REQUEST, e.to_string())),
    };

    match solve_blocking(classes, state.time_limit).await? {
        Ok(outcome) => Ok(HttpResponse::Ok().json(Report::new(&outcome))),
        Err(e) => Ok(error_response(actix_web::http::StatusCode::BAD_REQUEST, e.to_string())),
    }
}

// CSV upload: replaces the stored catalog and solves it
async fn upload(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    let classes = match read_csv_catalog(body.as_ref()) {
        Ok(classes) => classes,
        Err(e) => {
            return Ok(error_response(
                actix_web::http::StatusCode::BAD_REQUEST,
                format!("Failed to process CSV: {}", e),
            ))
        }
    };

    let outcome = match solve_blocking(classes.clone(), state.time_limit).await? {
        Ok(outcome) => outcome,
        Err(e) => return Ok(error_response(actix_web::http::StatusCode::BAD_REQUEST, e.to_string())),
    };
    info!(
        "Uploaded catalog with {} classes: {} solutions",
        classes.len(),
        outcome.solutions_found()
    );

    let response = HttpResponse::Ok().json(Report::new(&outcome));
    *state.classes.lock().unwrap() = Some(classes);
    *state.outcome.lock().unwrap() = Some(outcome);
    Ok(response)
}

async fn get_catalog(state: web::Data<AppState>) -> Result<HttpResponse> {
    let classes = state.classes.lock().unwrap();
    match *classes {
        Some(ref classes) => Ok(HttpResponse::Ok().json(CatalogResponse { classes })),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No catalog loaded"}))),
    }
}

async fn get_solutions(state: web::Data<AppState>) -> Result<HttpResponse> {
    let outcome = state.outcome.lock().unwrap();
    match *outcome {
        Some(ref outcome) => Ok(HttpResponse::Ok().json(Report::new(outcome))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No solutions available"}))),
    }
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/solve", web::post().to(solve))
        .route("/api/upload", web::post().to(upload))
        .route("/api/catalog", web::get().to(get_catalog))
        .route("/api/solutions", web::get().to(get_solutions));
}

/// Starts the HTTP server. A catalog loaded at startup is solved up front so
/// `/api/solutions` has something to serve.
pub async fn start_server(
    port: u16,
    initial: Option<Vec<CourseClass>>,
    time_limit: Option<Duration>,
) -> std::io::Result<()> {
    let outcome = match initial.clone() {
        Some(classes) => match solve_blocking(classes, time_limit).await {
            Ok(Ok(outcome)) => Some(outcome),
            _ => None,
        },
        None => None,
    };

    let app_state = web::Data::new(AppState {
        classes: Mutex::new(initial),
        outcome: Mutex::new(outcome),
        time_limit,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            classes: Mutex::new(None),
            outcome: Mutex::new(None),
            time_limit: None,
        })
    }

    #[actix_web::test]
    async fn test_solve_endpoint() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/solve")
            .set_json(serde_json::json!({"classes": [
                {"name": "A", "options": [[{"day": "mon", "period": "07:30-09:00"}]]},
                {"name": "B", "options": [
                    [{"day": "mon", "period": "07:30-09:00"}],
                    [{"day": "tue", "period": "09:05-10:35"}]
                ]}
            ]}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["solutions_found"], 1);
        assert_eq!(body["solutions"][0]["selection"], serde_json::json!([0, 1]));
    }

    #[actix_web::test]
    async fn test_solve_rejects_class_without_options() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/solve")
            .set_json(serde_json::json!({"classes": [{"name": "A", "options": []}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_upload_stores_catalog_and_solutions() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/solutions").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let csv = "code,name,option,day,period\nA,A,1,mon,07:30-09:00\nB,B,1,mon,07:30-09:00\nB,B,2,tue,09:05-10:35\n";
        let req = test::TestRequest::post()
            .uri("/api/upload")
            .set_payload(csv)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/solutions").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["solutions_found"], 1);

        let req = test::TestRequest::get().uri("/api/catalog").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["classes"][1]["name"], "B");
    }
}
