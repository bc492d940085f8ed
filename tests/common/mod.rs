use cabinet_lib::test_utils::build_workbook;
use cabinet_lib::CellValue;
use rack_importer::server::{router, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use tokio::net::TcpListener;

pub use cabinet_lib::test_utils::{header, rack_row, required_header, text};

pub const TEST_ORIGIN: &str = "https://racks.example.test";

/// Start the upload endpoint on a random local port and return its base URL
pub async fn spawn_server() -> String {
    let config = ServerConfig {
        allowed_origin: TEST_ORIGIN.to_string(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    };
    let app = router(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Build an in-memory .xlsx with one worksheet per (name, grid) entry
pub fn workbook_bytes(sheets: &[(&str, Vec<Vec<CellValue>>)]) -> Vec<u8> {
    let mut workbook = build_workbook(sheets).unwrap();
    workbook.save_to_buffer().unwrap()
}

/// Multipart form with the workbook in the `file` field
pub fn upload_form(bytes: Vec<u8>, file_name: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string()),
    )
}
