use futures::StreamExt;
use mockito::Matcher;
use tanya_llm::{
    collect_stream, ChatClient, ChatRequest, GeminiClient, Message, ProviderError, StreamEvent,
};

fn client(url: &str) -> GeminiClient {
    GeminiClient::builder()
        .api_key("test-key")
        .base_url(url)
        .build()
        .expect("client should build")
}

fn request() -> ChatRequest {
    ChatRequest::new(
        "gemini-2.5-flash",
        vec![
            Message::system("Kamu adalah asisten CS Amartha."),
            Message::human("Apa itu Celengan?"),
        ],
    )
}

#[tokio::test]
async fn test_stream_yields_fragments_then_done() {
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Celengan adalah \"}]}}]}\r\n\r\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"fitur tabungan.\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
    );

    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/models/gemini-2.5-flash:streamGenerateContent")
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJsonString(
            r#"{"system_instruction":{"parts":[{"text":"Kamu adalah asisten CS Amartha."}]}}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let mut stream = client(&server.url()).chat_stream(request()).await.unwrap();
    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event.unwrap());
    }

    handler.assert_async().await;
    assert_eq!(
        events,
        vec![
            StreamEvent::Message { content: "Celengan adalah ".to_string() },
            StreamEvent::Message { content: "fitur tabungan.".to_string() },
            StreamEvent::Done { finish_reason: Some("STOP".to_string()) },
        ]
    );
}

#[tokio::test]
async fn test_stream_without_finish_reason_still_terminates() {
    let mut server = mockito::Server::new_async().await;
    let _handler = server
        .mock("POST", "/models/gemini-2.5-flash:streamGenerateContent")
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .with_status(200)
        .with_body("data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Halo\"}]}}]}")
        .create_async()
        .await;

    let stream = client(&server.url()).chat_stream(request()).await.unwrap();
    assert_eq!(collect_stream(stream).await.unwrap(), "Halo");
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _handler = server
        .mock("POST", "/models/gemini-2.5-flash:streamGenerateContent")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"error":{"message":"quota exceeded"}}"#)
        .create_async()
        .await;

    let err = client(&server.url()).chat_stream(request()).await.err().unwrap();

    assert_eq!(err.status(), Some(429));
    assert!(err.body().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn test_malformed_chunk_is_stream_error() {
    let mut server = mockito::Server::new_async().await;
    let _handler = server
        .mock("POST", "/models/gemini-2.5-flash:streamGenerateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"ok\"}]}}]}\n\ndata: {oops\n\n")
        .create_async()
        .await;

    let mut stream = client(&server.url()).chat_stream(request()).await.unwrap();

    assert!(matches!(stream.next().await, Some(Ok(StreamEvent::Message { .. }))));
    assert!(matches!(
        stream.next().await,
        Some(Err(ProviderError::InvalidResponse { .. }))
    ));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_non_streaming_chat() {
    let mut server = mockito::Server::new_async().await;
    let _handler = server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .with_status(200)
        .with_body(
            r#"{"candidates":[{"content":{"parts":[{"text":"Tabungan Celengan"}]},"finishReason":"STOP"}],
                "usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":3,"totalTokenCount":13}}"#,
        )
        .create_async()
        .await;

    let response = client(&server.url()).chat(request()).await.unwrap();

    assert_eq!(response.text(), "Tabungan Celengan");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    assert_eq!(response.usage.unwrap().total_tokens, 13);
}
