//! Integration tests for IDP MCP Server

use async_trait::async_trait;
use idp_mcp_server::{BatchExtractor, CredentialStore, ExtractionBackend};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock service that answers each call with the next queued body and
/// counts how often it was invoked.
struct ScriptedBackend {
    calls: AtomicUsize,
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedBackend {
    fn new(responses: Vec<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            responses: Mutex::new(responses.into()),
        }
    }

    /// Success body whose payload names the submitted document.
    fn success_for(stem: &str) -> String {
        json!({
            "code": "200",
            "data": { "document": stem, "fields": { "total": "42.00" } }
        })
        .to_string()
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionBackend for ScriptedBackend {
    async fn extract(&self, _path: &Path, _api_key: &str) -> idp_mcp_server::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self
            .responses
            .lock()
            .pop_front()
            .expect("mock backend ran out of scripted responses");
        Ok(body)
    }
}

fn extractor_with(
    responses: Vec<String>,
    key: &str,
) -> (Arc<ScriptedBackend>, BatchExtractor<Arc<ScriptedBackend>>) {
    let backend = Arc::new(ScriptedBackend::new(responses));
    let extractor = BatchExtractor::new(backend.clone(), Arc::new(CredentialStore::new(key)));
    (backend, extractor)
}

fn write_pdf(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"%PDF-1.4 test fixture").unwrap();
}

#[tokio::test]
async fn test_successful_batch_manifest_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<PathBuf> = ["invoice.pdf", "contract.pdf", "receipt.pdf"]
        .iter()
        .map(|name| dir.path().join(name))
        .collect();
    for input in &inputs {
        write_pdf(input);
    }

    let (backend, extractor) = extractor_with(
        vec![
            ScriptedBackend::success_for("invoice"),
            ScriptedBackend::success_for("contract"),
            ScriptedBackend::success_for("receipt"),
        ],
        "valid-key",
    );

    let out = dir.path().join("out");
    let report = extractor
        .extract_files(&inputs, &out, "", "en")
        .await
        .unwrap();

    assert_eq!(report.status, "success");
    assert_eq!(
        report.saved_files,
        vec!["invoice.txt", "contract.txt", "receipt.txt"]
    );
    assert_eq!(backend.call_count(), 3);
    assert_eq!(
        report.save_dir,
        out.canonicalize().unwrap().display().to_string()
    );
    for name in &report.saved_files {
        assert!(out.join(name).exists());
    }
}

#[tokio::test]
async fn test_colliding_base_names_get_numeric_suffixes() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![
        dir.path().join("a/report.pdf"),
        dir.path().join("b/report.pdf"),
        dir.path().join("c/report.pdf"),
    ];
    for input in &inputs {
        write_pdf(input);
    }

    let (_, extractor) = extractor_with(
        vec![
            ScriptedBackend::success_for("first"),
            ScriptedBackend::success_for("second"),
            ScriptedBackend::success_for("third"),
        ],
        "valid-key",
    );

    let report = extractor
        .extract_files(&inputs, &dir.path().join("out"), "", "en")
        .await
        .unwrap();

    assert_eq!(
        report.saved_files,
        vec!["report.txt", "report_1.txt", "report_2.txt"]
    );
}

#[tokio::test]
async fn test_save_dir_created_with_parents() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    write_pdf(&input);

    let (_, extractor) = extractor_with(vec![ScriptedBackend::success_for("doc")], "valid-key");

    let out = dir.path().join("deeply/nested/out");
    let report = extractor
        .extract_files(&[input], &out, "", "en")
        .await
        .unwrap();

    assert!(out.is_dir());
    assert_eq!(report.saved_files, vec!["doc.txt"]);
}

#[tokio::test]
async fn test_empty_credential_fails_without_touching_backend() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    write_pdf(&input);

    let (backend, extractor) = extractor_with(vec![], "");

    let err = extractor
        .extract_files(&[input], &dir.path().join("out"), "", "en")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "400");
    assert_eq!(err.client_message(), "Invalid API key");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_mid_batch_failure_keeps_earlier_output() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<PathBuf> = ["one.pdf", "two.pdf", "three.pdf"]
        .iter()
        .map(|name| dir.path().join(name))
        .collect();
    for input in &inputs {
        write_pdf(input);
    }

    let (backend, extractor) = extractor_with(
        vec![
            ScriptedBackend::success_for("one"),
            ScriptedBackend::success_for("two"),
            json!({"code": "02201", "msg": "Document is encrypted"}).to_string(),
        ],
        "valid-key",
    );

    let out = dir.path().join("out");
    let err = extractor
        .extract_files(&inputs, &out, "", "en")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "02201");
    assert_eq!(err.client_message(), "Document is encrypted");
    assert_eq!(backend.call_count(), 3);

    // files written before the failure stay on disk, nothing after
    assert!(out.join("one.txt").exists());
    assert!(out.join("two.txt").exists());
    assert!(!out.join("three.txt").exists());

    let content: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("one.txt")).unwrap()).unwrap();
    assert_eq!(content["document"], "one");
}

#[tokio::test]
async fn test_written_payload_round_trips_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    write_pdf(&input);

    let payload = json!({
        "vendor": "宏达电子",
        "items": [{"name": "widget", "qty": 3}],
        "total": 199.99
    });
    let (_, extractor) = extractor_with(
        vec![json!({"code": "200", "data": payload}).to_string()],
        "valid-key",
    );

    let out = dir.path().join("out");
    extractor
        .extract_files(&[input], &out, "", "en")
        .await
        .unwrap();

    let text = std::fs::read_to_string(out.join("doc.txt")).unwrap();
    let read_back: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(read_back, payload);
    // non-ASCII stays literal in the file
    assert!(text.contains("宏达电子"));
}

#[tokio::test]
async fn test_scalar_payload_written_as_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    write_pdf(&input);

    let (_, extractor) = extractor_with(
        vec![json!({"code": "200", "data": "plain extraction result"}).to_string()],
        "valid-key",
    );

    let out = dir.path().join("out");
    extractor
        .extract_files(&[input], &out, "", "en")
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(out.join("doc.txt")).unwrap(),
        "plain extraction result"
    );
}

#[tokio::test]
async fn test_folder_extraction_recursive_picks_up_nested_files() {
    let dir = tempfile::tempdir().unwrap();
    write_pdf(&dir.path().join("inputs/top.pdf"));
    write_pdf(&dir.path().join("inputs/nested/inner.pdf"));

    let (_, extractor) = extractor_with(
        vec![
            ScriptedBackend::success_for("inner"),
            ScriptedBackend::success_for("top"),
        ],
        "valid-key",
    );

    let report = extractor
        .extract_folder(
            &dir.path().join("inputs"),
            &dir.path().join("out"),
            true,
            "",
            "en",
        )
        .await
        .unwrap();

    // discovery sorts by path, so nested/inner.pdf precedes top.pdf
    assert_eq!(report.saved_files, vec!["inner.txt", "top.txt"]);
}

#[tokio::test]
async fn test_folder_extraction_non_recursive_ignores_nested_files() {
    let dir = tempfile::tempdir().unwrap();
    write_pdf(&dir.path().join("inputs/top.pdf"));
    write_pdf(&dir.path().join("inputs/nested/inner.pdf"));

    let (backend, extractor) =
        extractor_with(vec![ScriptedBackend::success_for("top")], "valid-key");

    let report = extractor
        .extract_folder(
            &dir.path().join("inputs"),
            &dir.path().join("out"),
            false,
            "",
            "en",
        )
        .await
        .unwrap();

    assert_eq!(report.saved_files, vec!["top.txt"]);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_key_override_persists_across_calls() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    write_pdf(&input);

    let (_, extractor) = extractor_with(
        vec![
            ScriptedBackend::success_for("doc"),
            ScriptedBackend::success_for("doc"),
        ],
        "",
    );

    let out = dir.path().join("out");

    // first call supplies the key
    extractor
        .extract_files(std::slice::from_ref(&input), &out, "supplied-key", "en")
        .await
        .unwrap();

    // second call relies on the persisted override
    let report = extractor
        .extract_files(&[input], &out, "", "en")
        .await
        .unwrap();
    assert_eq!(report.saved_files, vec!["doc_1.txt"]);
}

#[tokio::test]
async fn test_error_message_locale_follows_request() {
    let dir = tempfile::tempdir().unwrap();

    let (_, extractor) = extractor_with(vec![], "");
    let missing = vec![dir.path().join("gone.pdf")];

    let err = extractor
        .extract_files(&missing, &dir.path().join("out"), "some-key", "zh")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "01203");
    assert_eq!(err.client_message(), "找不到或无法打开文件");

    let err = extractor
        .extract_files(&missing, &dir.path().join("out"), "", "nope")
        .await
        .unwrap_err();
    // unsupported locale falls back to en
    assert_eq!(err.client_message(), "File not found or cannot be opened");
}
