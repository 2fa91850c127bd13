use bytes::Bytes;
use serde_json::json;
use wiremock::matchers::{body_bytes, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::internal::auth::structs::upload_token::ResolvedToken;
use crate::tests::init_tracing;
use crate::uploader::{
    FileUploader, HttpTransport, SourceFile, UploadConfig, UploadError, UploadTransport,
};

fn token() -> ResolvedToken {
    ResolvedToken::new("tok").unwrap()
}

#[tokio::test]
async fn test_make_block_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mkblk/4194304"))
        .and(header("authorization", "UpToken tok"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_bytes(b"hello".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ctx": "c1",
            "checksum": "x",
            "crc32": 123,
            "offset": 5,
            "host": "http://up-z0.test"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(None).unwrap();
    let result = transport
        .make_block(&server.uri(), 4_194_304, Bytes::from_static(b"hello"), &token())
        .await
        .unwrap();

    assert_eq!(result.ctx, "c1");
    assert_eq!(result.crc32, 123);
    assert_eq!(result.offset, 5);
    assert_eq!(result.next_host(), Some("http://up-z0.test"));
}

#[tokio::test]
async fn test_put_chunk_puts_ctx_and_offset_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bput/c1/5"))
        .and(header("authorization", "UpToken tok"))
        .and(body_bytes(b"world".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ctx": "c2",
            "offset": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(None).unwrap();
    let result = transport
        .put_chunk(&server.uri(), "c1", 5, Bytes::from_static(b"world"), &token())
        .await
        .unwrap();

    // 缺省字段取默认值
    assert_eq!(result.ctx, "c2");
    assert_eq!(result.checksum, "");
    assert_eq!(result.host, None);
}

#[tokio::test]
async fn test_make_file_sends_ctx_list_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mkfile/10/key/ZG9jcy9hLnR4dA=="))
        .and(header("content-type", "text/plain"))
        .and(body_string("c2,d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "Fh8x",
            "key": "docs/a.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(None).unwrap();
    let created = transport
        .make_file(
            &server.uri(),
            10,
            "ZG9jcy9hLnR4dA==",
            "c2,d1".to_string(),
            &token(),
        )
        .await
        .unwrap();

    assert_eq!(created.hash, "Fh8x");
    assert_eq!(created.key, "docs/a.txt");
}

#[tokio::test]
async fn test_error_field_becomes_protocol_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "expired token" })),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(None).unwrap();
    let err = transport
        .make_block(&server.uri(), 4, Bytes::from_static(b"abcd"), &token())
        .await
        .unwrap_err();

    match err {
        UploadError::Protocol { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "expired token");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_error_body_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway upstream"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(None).unwrap();
    let err = transport
        .put_chunk(&server.uri(), "c", 0, Bytes::from_static(b"x"), &token())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UploadError::Protocol { status: 502, ref message } if message == "bad gateway upstream"
    ));
}

#[tokio::test]
async fn test_malformed_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(None).unwrap();
    let err = transport
        .make_block(&server.uri(), 1, Bytes::from_static(b"x"), &token())
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_upload_over_http() {
    init_tracing();
    let server = MockServer::start().await;
    let uri = server.uri();

    // "hello world!" 按 8 字节分块、4 字节分片：块 0 两片，块 1 一片
    Mock::given(method("POST"))
        .and(path("/mkblk/8"))
        .and(body_bytes(b"hell".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ctx": "ctxA1", "offset": 4, "host": uri
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bput/ctxA1/4"))
        .and(body_bytes(b"o wo".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ctx": "ctxA2", "offset": 8, "host": uri
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mkblk/4"))
        .and(body_bytes(b"rld!".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ctx": "ctxB1", "offset": 4, "host": uri
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mkfile/12/key/ZG9jcy9hLnR4dA=="))
        .and(header("authorization", "UpToken tok"))
        .and(body_string("ctxA2,ctxB1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "FhHello", "key": "docs/a.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = UploadConfig::new("tok")
        .host(format!("{uri}/"))
        .domain("https://cdn.test")
        .block_size(8)
        .chunk_size(4)
        .get_key(|_| "docs/a.txt".to_string());

    let file = FileUploader::new(config)
        .send(&SourceFile::from_bytes("a.txt", &b"hello world!"[..]))
        .await
        .unwrap();

    assert_eq!(file.hash, "FhHello");
    assert_eq!(file.key, "docs/a.txt");
    assert_eq!(file.size, 12);
    assert_eq!(file.mime_type, "text/plain");
    assert_eq!(file.url, "https://cdn.test/docs/a.txt");
}
