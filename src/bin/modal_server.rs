//! Modal Share Server
//!
//! Serves the normalized table as JSON for a chart front end.
//! Run with: cargo run --bin modal_server [FILE...]

use modalshare::config::Config;
use modalshare::logging;
use modalshare::pipeline::{summary_json, PipelineCache, SourceText};
use modalshare::query::{select, Selection};
use modalshare::seed;
use modalshare::timeline::Timeline;
use modalshare::types::Period;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use url::Url;

type Response = (&'static str, &'static str, String);

fn not_found() -> Response {
    ("404 NOT FOUND", "text/plain", "Not Found".to_string())
}

fn bad_request(msg: &str) -> Response {
    ("400 BAD REQUEST", "application/json", json!({ "error": msg }).to_string())
}

/// Answer one request line such as `GET /api/table?period=2016 HTTP/1.1`.
fn route(request: &str, sources: &[SourceText], cache: &mut PipelineCache, cfg: &Config) -> Response {
    let mut parts = request.split_whitespace();
    let (Some("GET"), Some(target)) = (parts.next(), parts.next()) else {
        return not_found();
    };
    let Ok(url) = Url::parse(&format!("http://localhost{}", target)) else {
        return bad_request("bad request target");
    };

    match url.path() {
        "/api/health" => ("200 OK", "application/json", r#"{"status":"ok"}"#.to_string()),
        "/api/summary" => {
            let out = cache.get_or_run(sources, cfg);
            ("200 OK", "application/json", summary_json(&out).to_string())
        }
        "/api/timeline" => {
            let out = cache.get_or_run(sources, cfg);
            let timeline = Timeline::from_table(&out.table);
            ("200 OK", "application/json", json!(timeline).to_string())
        }
        "/api/diagnostics" => {
            let out = cache.get_or_run(sources, cfg);
            ("200 OK", "application/json", json!(out.diagnostics).to_string())
        }
        "/api/table" => {
            let out = cache.get_or_run(sources, cfg);
            let mut period = None;
            let mut countries: Option<Vec<String>> = None;
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "period" => match value.parse::<Period>() {
                        Ok(p) => period = Some(p),
                        Err(err) => return bad_request(&err),
                    },
                    "countries" => {
                        countries = Some(
                            value
                                .split(',')
                                .map(str::trim)
                                .filter(|c| !c.is_empty())
                                .map(str::to_string)
                                .collect(),
                        )
                    }
                    _ => {}
                }
            }
            let Some(period) = period.or(Timeline::from_table(&out.table).default) else {
                return bad_request("no periods loaded");
            };
            let mut selection = Selection::period(period);
            if let Some(c) = countries {
                selection = selection.with_countries(&c);
            }
            let view = select(&out.table, &selection, cfg);
            logging::log_view(&period.to_string(), view.rows.len(), view.notice.as_deref());
            ("200 OK", "application/json", json!(view).to_string())
        }
        _ => not_found(),
    }
}

fn load_sources() -> Vec<SourceText> {
    let files: Vec<String> = std::env::args().skip(1).collect();
    if files.is_empty() {
        return seed::sources();
    }
    let mut sources = Vec::new();
    for path in files {
        match std::fs::read_to_string(&path) {
            Ok(text) => sources.push(SourceText::series(&path, &text)),
            Err(err) => eprintln!("skipping {}: {}", path, err),
        }
    }
    sources
}

fn main() {
    let cfg = Config::from_env();
    let sources = load_sources();
    let mut cache = PipelineCache::new();
    let listener = match TcpListener::bind(format!("127.0.0.1:{}", cfg.server_port)) {
        Ok(l) => l,
        Err(err) => {
            eprintln!("failed to bind port {}: {}", cfg.server_port, err);
            std::process::exit(1);
        }
    };

    println!("Modal Share Server running at http://localhost:{}", cfg.server_port);
    println!();
    println!("Endpoints:");
    println!("  GET /api/table?period=P&countries=A,B - One period, display-ready");
    println!("  GET /api/timeline                     - Selectable periods");
    println!("  GET /api/summary                      - Row count and diagnostics by kind");
    println!("  GET /api/diagnostics                  - Every diagnostic");
    println!("  GET /api/health                       - Health check");
    println!();

    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(s) => s,
            Err(_) => continue,
        };

        let buf_reader = BufReader::new(&stream);
        let request = match buf_reader.lines().next() {
            Some(Ok(line)) => line,
            _ => continue,
        };

        let (status, content_type, body) = route(&request, &sources, &mut cache, &cfg);
        let response = format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Content-Length: {}\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );

        let _ = stream.write_all(response.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &str, cache: &mut PipelineCache) -> Response {
        route(
            &format!("GET {} HTTP/1.1", path),
            &seed::sources(),
            cache,
            &Config::default(),
        )
    }

    #[test]
    fn test_table_endpoint_filters() {
        let mut cache = PipelineCache::new();
        let (status, _, body) = get("/api/table?period=2016&countries=Brasil,USA", &mut cache);
        assert_eq!(status, "200 OK");
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["rows"].as_array().unwrap().len(), 2);
        assert_eq!(v["period"], "2016");
    }

    #[test]
    fn test_repeat_requests_hit_cache() {
        let mut cache = PipelineCache::new();
        get("/api/timeline", &mut cache);
        get("/api/summary", &mut cache);
        assert_eq!((cache.misses, cache.hits), (1, 1));
    }

    #[test]
    fn test_bad_period_and_unknown_path() {
        let mut cache = PipelineCache::new();
        assert_eq!(get("/api/table?period=soon", &mut cache).0, "400 BAD REQUEST");
        assert_eq!(get("/nope", &mut cache).0, "404 NOT FOUND");
        assert_eq!(route("POST /api/table HTTP/1.1", &[], &mut cache, &Config::default()).0, "404 NOT FOUND");
    }
}
