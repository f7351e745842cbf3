//! Drives `HttpStudyApi` against a scripted HTTP responder on a local socket.

use std::{
    sync::Arc,
    time::Duration,
};

use mindmate::{
    backend::{
        DocumentUpdate,
        HttpStudyApi,
        LoginRequest,
        NewDocument,
        PdfUpload,
        SignupRequest,
        StudyApi,
    },
    core::{
        http::http_client,
        DocumentType,
        session::{
            MemoryTokenStorage,
            Session,
        },
        MindmateError,
    },
};
use tokio::{
    io::{
        AsyncReadExt,
        AsyncWriteExt,
    },
    net::{
        TcpListener,
        TcpStream,
    },
    task::JoinHandle,
};

/// Answers one connection per scripted response, in order, and hands back the raw
/// requests it saw.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            seen.push(read_request(&mut stream).await);

            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason(status),
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
        seen
    });

    (base_url, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Status",
    }
}

fn api(base_url: &str, token: Option<&str>) -> HttpStudyApi {
    let storage = match token {
        Some(token) => MemoryTokenStorage::with_token(token),
        None => MemoryTokenStorage::default(),
    };
    let session = Session::new(Arc::new(storage));
    session.init();

    let client = http_client(Duration::from_secs(5)).unwrap();
    HttpStudyApi::with_client(client, base_url, session)
}

#[tokio::test]
async fn login_posts_credentials_without_a_bearer() {
    let (base_url, server) = serve(vec![(200, r#"{"message":"Logged in","token":"abc"}"#)]).await;
    let api = api(&base_url, None);

    let response = api
        .login(&LoginRequest { email: "ada@example.com".into(), password: "secret".into() })
        .await
        .unwrap();
    assert_eq!(response.token.as_deref(), Some("abc"));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /auth/login "));
    assert!(requests[0].contains(r#""email":"ada@example.com""#));
    assert!(!requests[0].to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn authorized_calls_carry_the_bearer_and_unwrap_envelopes() {
    let body = r#"{"subjects":[{"_id":"s1","name":"Biology"},{"_id":"s2","name":"History"}]}"#;
    let (base_url, server) = serve(vec![(200, body)]).await;
    let api = api(&base_url, Some("tok-123"));

    let subjects = api.list_subjects().await.unwrap();
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[1].name, "History");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /subjects "));
    assert!(requests[0].to_lowercase().contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn missing_session_fails_before_sending() {
    let api = api("http://127.0.0.1:9", None);

    let err = api.list_subjects().await.unwrap_err();
    assert!(matches!(err, MindmateError::MissingToken));
    assert!(err.is_unauthorized());
    assert!(!api.validate_token().await.unwrap());
}

#[tokio::test]
async fn rejected_token_surfaces_as_unauthorized() {
    let (base_url, server) = serve(vec![(401, r#"{"message":"Token expired"}"#)]).await;
    let api = api(&base_url, Some("stale"));

    let err = api.get_document("d1").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Session expired: Token expired");
    server.await.unwrap();
}

#[tokio::test]
async fn server_messages_become_error_text() {
    let (base_url, server) = serve(vec![
        (400, r#"{"error":"Subject name is required"}"#),
        (404, "<html>missing</html>"),
    ])
    .await;
    let api = api(&base_url, Some("tok"));

    let err = api.delete_subject("s1").await.unwrap_err();
    assert!(matches!(err, MindmateError::Api { status: 400, .. }));
    assert_eq!(err.to_string(), "Subject name is required");

    let err = api.delete_document("d1").await.unwrap_err();
    assert_eq!(err.to_string(), "Not Found");
    assert!(!err.is_unauthorized());

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("DELETE /subjects/s1 "));
    assert!(requests[1].starts_with("DELETE /documents/d1 "));
}

#[tokio::test]
async fn validate_reports_rejection_as_false() {
    let (base_url, server) = serve(vec![(200, r#"{"valid":true}"#), (401, "{}")]).await;
    let api = api(&base_url, Some("tok"));

    assert!(api.validate_token().await.unwrap());
    assert!(!api.validate_token().await.unwrap());

    let requests = server.await.unwrap();
    assert!(requests.iter().all(|r| r.starts_with("GET /auth/validate ")));
}

#[tokio::test]
async fn message_only_update_refetches_the_document() {
    let (base_url, server) = serve(vec![
        (200, r#"{"message":"Document updated"}"#),
        (200, r#"{"document":{"_id":"d1","title":"Renamed","type":"text","summaryStatus":"completed"}}"#),
    ])
    .await;
    let api = api(&base_url, Some("tok"));

    let update = DocumentUpdate { title: Some("Renamed".into()), content: None };
    let doc = api.update_document("d1", &update).await.unwrap();
    assert_eq!(doc.title, "Renamed");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("PUT /documents/d1 "));
    assert!(requests[0].ends_with(r#"{"title":"Renamed"}"#));
    assert!(requests[1].starts_with("GET /documents/d1 "));
}

#[tokio::test]
async fn process_hits_the_process_route() {
    let (base_url, server) = serve(vec![(200, r#"{"message":"Processing started"}"#)]).await;
    let api = api(&base_url, Some("tok"));

    api.process_document("d7").await.unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /documents/process/d7 "));
}

#[tokio::test]
async fn signup_posts_the_profile_and_may_return_no_token() {
    let (base_url, server) = serve(vec![(201, r#"{"message":"User created"}"#)]).await;
    let api = api(&base_url, None);

    let response = api
        .signup(&SignupRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.token, None);
    assert_eq!(response.message, "User created");

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /auth/signup "));
    assert!(requests[0].contains(r#""name":"Ada""#));
    assert!(requests[0].contains(r#""email":"ada@example.com""#));
    assert!(!requests[0].to_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn created_documents_come_back_from_their_envelope() {
    let body = r#"{"message":"Created","document":{"_id":"d9","title":"Lecture 3","type":"youtube","content":"https://youtu.be/x","subjectId":"s1"}}"#;
    let (base_url, server) = serve(vec![(201, body)]).await;
    let api = api(&base_url, Some("tok"));

    let doc = api
        .create_document(&NewDocument {
            title: "Lecture 3".into(),
            doc_type: DocumentType::Youtube,
            content: Some("https://youtu.be/x".into()),
            subject_id: "s1".into(),
        })
        .await
        .unwrap();
    assert_eq!(doc.id, "d9");
    assert_eq!(doc.doc_type, DocumentType::Youtube);
    assert_eq!(doc.subject_id.as_deref(), Some("s1"));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /documents "));
    assert!(requests[0].contains(r#""type":"youtube""#));
    assert!(requests[0].contains(r#""subjectId":"s1""#));
    assert!(requests[0].to_lowercase().contains("authorization: bearer tok"));
}

#[tokio::test]
async fn subject_documents_are_listed_from_their_envelope() {
    let body = r#"{"documents":[{"_id":"d1","title":"Cells","type":"text"},{"_id":"d2","title":"Slides","type":"pdf"}]}"#;
    let (base_url, server) = serve(vec![(200, body)]).await;
    let api = api(&base_url, Some("tok"));

    let documents = api.list_documents("s1").await.unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].doc_type, DocumentType::Pdf);

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /documents/subject/s1 "));
}

#[tokio::test]
async fn pdf_upload_is_a_multipart_file_field() {
    let body = r#"{"document":{"_id":"d1","title":"Slides","type":"pdf","fileUrl":"uploads/lecture.pdf"}}"#;
    let (base_url, server) = serve(vec![(200, body)]).await;
    let api = api(&base_url, Some("tok"));

    let upload = PdfUpload { file_name: "lecture.pdf".into(), bytes: b"%PDF-1.4".to_vec() };
    let doc = api.attach_pdf("d1", upload).await.unwrap();
    assert_eq!(doc.file_url.as_deref(), Some("uploads/lecture.pdf"));

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert!(request.starts_with("POST /documents/d1/attach-pdf "));
    assert!(request.to_lowercase().contains("content-type: multipart/form-data; boundary="));
    assert!(request.contains(r#"name="file""#));
    assert!(request.contains(r#"filename="lecture.pdf""#));
    assert!(request.to_lowercase().contains("application/pdf"));
    assert!(request.contains("%PDF-1.4"));
}
