// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Web form for running renames from a browser

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::copy::RunReport;
use crate::naming::detect_codes;
use crate::{JobRequest, RenameJob};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
}

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/rename", post(api_rename))
        .route("/api/detect", get(api_detect))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// === Page Handlers ===

async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(&state.config))
}

// === API Handlers ===

#[derive(Serialize, Deserialize, Debug)]
pub struct RenameResponse {
    pub ok: bool,
    pub log: Vec<String>,
    pub report: Option<RunReport>,
}

async fn api_rename(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<JobRequest>, JsonRejection>,
) -> Json<RenameResponse> {
    // a bad field (e.g. a negative angle count) is a form error, not a bare 422
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!("Rejected form data: {}", rejection.body_text());
            return Json(RenameResponse {
                ok: false,
                log: vec![format!("error: {}", rejection.body_text())],
                report: None,
            });
        }
    };

    let config = state.config.clone();
    let outcome = tokio::task::spawn_blocking(move || -> crate::Result<(Vec<String>, RunReport)> {
        let job = RenameJob::from_request(request, &config)?;
        info!("Form run: {:?} mode={}", job.work_dir, job.mode);
        let header = vec![
            "--- start ---".to_string(),
            format!("source folder: {}", job.work_dir.display()),
            format!("mode: {}", job.mode),
        ];
        job.run().map(|report| (header, report))
    })
    .await;

    let response = match outcome {
        Ok(Ok((mut log, report))) => {
            log.extend(report.log_lines());
            log.push("done.".to_string());
            RenameResponse { ok: true, log, report: Some(report) }
        }
        Ok(Err(e)) => {
            error!("Form run failed: {}", e);
            RenameResponse { ok: false, log: vec![format!("error: {}", e)], report: None }
        }
        Err(e) => {
            error!("Rename worker panicked: {}", e);
            RenameResponse {
                ok: false,
                log: vec![format!("unexpected error: {}", e)],
                report: None,
            }
        }
    };
    Json(response)
}

#[derive(Deserialize)]
struct DetectQuery {
    path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct DetectResponse {
    pub region: Option<String>,
    pub date: Option<String>,
}

async fn api_detect(Query(query): Query<DetectQuery>) -> Json<DetectResponse> {
    let codes = detect_codes(&query.path);
    Json(DetectResponse {
        region: codes.as_ref().map(|(r, _)| r.to_string()),
        date: codes.as_ref().map(|(_, d)| d.to_string()),
    })
}

// === Template Rendering ===

fn base_template(title: &str, content: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - angle-renamer</title>
    <style>
        :root {{
            --bg-primary: #1a1a2e;
            --bg-card: #0f3460;
            --text-primary: #e8e8e8;
            --text-secondary: #a0a0a0;
            --accent: #e94560;
            --border: #2a2a4a;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }}
        .container {{ max-width: 900px; margin: 0 auto; padding: 20px; }}
        .card {{
            background: var(--bg-card);
            border-radius: 12px;
            padding: 20px;
            margin-bottom: 20px;
        }}
        .card h2 {{ margin-bottom: 15px; color: var(--accent); }}
        label {{ display: block; color: var(--text-secondary); margin-top: 10px; }}
        input[type=text], input[type=number] {{
            width: 100%;
            padding: 8px;
            background: var(--bg-primary);
            color: var(--text-primary);
            border: 1px solid var(--border);
            border-radius: 6px;
        }}
        button {{
            margin-top: 15px;
            width: 100%;
            padding: 10px;
            background: var(--accent);
            color: white;
            border: none;
            border-radius: 6px;
            font-size: 1em;
        }}
        button:disabled {{ opacity: 0.5; }}
        #log {{
            white-space: pre-wrap;
            font-family: monospace;
            min-height: 240px;
            background: var(--bg-primary);
            border: 1px solid var(--border);
            border-radius: 6px;
            padding: 10px;
        }}
    </style>
</head>
<body>
    <main class="container">
        {}
    </main>
</body>
</html>"#, title, content)
}

fn render_index(config: &AppConfig) -> String {
    let content = format!(r#"
        <h1>Image Batch Renamer</h1>
        <div class="card">
            <h2>Settings</h2>
            <label for="source_dir">Source folder</label>
            <input type="text" id="source_dir" placeholder="/path/to/HR250701" onchange="detectCodes()">
            <label for="region">Region code</label>
            <input type="text" id="region" maxlength="2" placeholder="HR">
            <label for="date">Date code</label>
            <input type="text" id="date" maxlength="6" placeholder="250701">
            <label>Mode</label>
            <label><input type="radio" name="mode" value="subfolder" checked onchange="toggleMode()"> Subfolder</label>
            <label><input type="radio" name="mode" value="single_folder" onchange="toggleMode()"> Single folder</label>
            <div id="single_opts" style="display: none;">
                <label for="image_folder">Image sub folder</label>
                <input type="text" id="image_folder" value="{image_folder}">
                <label for="angle_num">Angles per group</label>
                <input type="number" id="angle_num" min="1" max="26" value="{angle_num}">
            </div>
            <label><input type="checkbox" id="dry_run"> Dry run</label>
            <button id="start" onclick="startRename()">Start renaming</button>
        </div>
        <div class="card">
            <h2>Log</h2>
            <div id="log"></div>
        </div>
        <script>
        function mode() {{
            return document.querySelector('input[name=mode]:checked').value;
        }}
        function toggleMode() {{
            document.getElementById('single_opts').style.display =
                mode() === 'single_folder' ? 'block' : 'none';
        }}
        async function detectCodes() {{
            const path = document.getElementById('source_dir').value;
            const res = await fetch('/api/detect?path=' + encodeURIComponent(path));
            const codes = await res.json();
            if (codes.region) document.getElementById('region').value = codes.region;
            if (codes.date) document.getElementById('date').value = codes.date;
        }}
        async function startRename() {{
            const button = document.getElementById('start');
            const log = document.getElementById('log');
            button.disabled = true;
            button.textContent = 'Working...';
            log.textContent = '';
            const body = {{
                source_dir: document.getElementById('source_dir').value,
                region: document.getElementById('region').value,
                date: document.getElementById('date').value,
                mode: mode(),
                image_folder: document.getElementById('image_folder').value,
                angle_num: parseInt(document.getElementById('angle_num').value, 10),
                dry_run: document.getElementById('dry_run').checked,
            }};
            try {{
                const res = await fetch('/api/rename', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify(body),
                }});
                const data = await res.json();
                log.textContent = data.log.join('\n');
            }} catch (e) {{
                log.textContent = 'error: ' + e;
            }} finally {{
                button.disabled = false;
                button.textContent = 'Start renaming';
            }}
        }}
        </script>
    "#,
        image_folder = config.image_folder,
        angle_num = config.angle_num,
    );

    base_template("Rename", &content)
}

/// Start the web server
pub async fn start_server(config: AppConfig) -> crate::Result<()> {
    let state = Arc::new(AppState { config: config.clone() });

    let addr = format!("{}:{}", config.web.host, config.web.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Rename form available at http://{}", addr);

    let router = create_router(state);
    axum::serve(listener, router)
        .await
        .map_err(|e| crate::RenameError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(AppState { config: AppConfig::default() }))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(res: axum::response::Response) -> T {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_page_has_form() {
        let res = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(r#"id="image_folder" value="phone_image""#));
    }

    #[tokio::test]
    async fn test_detect_codes() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/api/detect?path=%2Fdata%2Fsy250623")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let detected: DetectResponse = body_json(res).await;
        assert_eq!(detected.region.as_deref(), Some("SY"));
        assert_eq!(detected.date.as_deref(), Some("250623"));
    }

    #[tokio::test]
    async fn test_rename_validation_error_is_logged() {
        let body = serde_json::json!({ "region": "H", "date": "250701", "mode": "subfolder" });
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/rename")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let out: RenameResponse = body_json(res).await;
        assert!(!out.ok);
        assert!(out.log[0].contains("Invalid region code"));
    }

    #[tokio::test]
    async fn test_rename_bad_field_type_is_logged() {
        let body = serde_json::json!({
            "region": "HR",
            "date": "250701",
            "mode": "single_folder",
            "angle_num": -1,
        });
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/rename")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let out: RenameResponse = body_json(res).await;
        assert!(!out.ok);
        assert!(out.report.is_none());
        assert!(out.log[0].starts_with("error: "));
        assert!(out.log[0].contains("angle_num"));
    }

    #[tokio::test]
    async fn test_rename_runs_job() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("phone_image");
        std::fs::create_dir_all(&images).unwrap();
        for name in ["a-01.jpg", "b.jpg", "c.jpg"] {
            std::fs::write(images.join(name), name).unwrap();
        }

        let body = serde_json::json!({
            "source_dir": dir.path(),
            "region": "sy",
            "date": "250623",
            "mode": "single_folder",
            "angle_num": 2,
        });
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/rename")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let out: RenameResponse = body_json(res).await;
        assert!(out.ok, "{:?}", out.log);
        assert_eq!(out.report.unwrap().renamed, 2);
        assert!(dir.path().join("renamed").join("SY-250623-0101-B.jpg").exists());
        assert_eq!(out.log.last().map(String::as_str), Some("done."));
    }
}
