use crate::tests::{
    MockTransport, RecordedCall, TEST_HOST, ctx_for, patterned_bytes, request_context,
};
use crate::internal::uploader::structs::block_session::BlockSession;
use crate::uploader::UploadError;
use crate::uploader::functions::split_blocks;

/// 10 字节的单块，每片 4 字节：共 3 片
fn single_block_session() -> BlockSession {
    let data = patterned_bytes(10, 10);
    let block = split_blocks(&data, 10).unwrap().remove(0);
    BlockSession::new(&block, 4).unwrap()
}

#[tokio::test]
async fn test_each_chunk_uses_previous_ctx() {
    let mock = MockTransport::new().into_arc();
    let cx = request_context(mock.clone());
    let mut session = single_block_session();
    assert_eq!(session.remaining(), 3);

    let mut sent = Vec::new();
    while let Some(bytes) = session.upload_next(&cx).await.unwrap() {
        sent.push(bytes);
    }
    assert_eq!(sent, vec![4, 4, 2]);

    assert_eq!(
        mock.calls(),
        vec![
            RecordedCall::MakeBlock {
                host: TEST_HOST.to_string(),
                block_index: 0,
                block_size: 10,
                chunk_len: 4,
            },
            RecordedCall::PutChunk {
                host: TEST_HOST.to_string(),
                block_index: 0,
                ctx: ctx_for(0, 0),
                offset: 4,
                chunk_len: 4,
            },
            RecordedCall::PutChunk {
                host: TEST_HOST.to_string(),
                block_index: 0,
                ctx: ctx_for(0, 1),
                offset: 8,
                chunk_len: 2,
            },
        ]
    );

    let result = session.into_result().unwrap();
    assert_eq!(result.ctx, ctx_for(0, 2));
    assert_eq!(result.offset, 10);
    assert!(
        mock.authorizations()
            .iter()
            .all(|a| a == "UpToken test-token")
    );
}

#[tokio::test]
async fn test_follow_up_chunks_go_to_returned_host() {
    let mock = MockTransport::new().redirect_to("http://up-z1.test/").into_arc();
    let cx = request_context(mock.clone());
    let mut session = single_block_session();
    while session.upload_next(&cx).await.unwrap().is_some() {}

    let hosts: Vec<_> = mock
        .calls()
        .into_iter()
        .map(|c| match c {
            RecordedCall::MakeBlock { host, .. } | RecordedCall::PutChunk { host, .. } => host,
            RecordedCall::MakeFile { host, .. } => host,
        })
        .collect();
    // 第一片总是发往配置的地址，结尾的 `/` 被去掉
    assert_eq!(hosts, vec![TEST_HOST, "http://up-z1.test", "http://up-z1.test"]);
}

#[tokio::test]
async fn test_failed_chunk_stops_session() {
    let mock = MockTransport::new().fail_at(0, 1).into_arc();
    let cx = request_context(mock.clone());
    let mut session = single_block_session();

    assert_eq!(session.upload_next(&cx).await.unwrap(), Some(4));
    let err = session.upload_next(&cx).await.unwrap_err();
    assert!(matches!(err, UploadError::Protocol { status: 400, .. }));

    assert_eq!(mock.calls().len(), 2);
    // 失败的片不出队
    assert_eq!(session.remaining(), 2);
    assert!(session.into_result().is_none());
}

#[tokio::test]
async fn test_session_refuses_to_continue_after_failure() {
    let mock = MockTransport::new().fail_at(0, 1).into_arc();
    let cx = request_context(mock.clone());
    let mut session = single_block_session();

    session.upload_next(&cx).await.unwrap();
    session.upload_next(&cx).await.unwrap_err();

    // 再次调用不能用旧的 ctx 提交后面的片
    let err = session.upload_next(&cx).await.unwrap_err();
    assert!(matches!(err, UploadError::BlockAborted { block_index: 0 }));
    assert_eq!(mock.calls().len(), 2);
    assert!(!mock.calls().iter().any(|c| matches!(
        c,
        RecordedCall::PutChunk { chunk_len: 2, .. }
    )));
}

#[tokio::test]
async fn test_failed_last_chunk_has_no_block_result() {
    let mock = MockTransport::new().fail_at(0, 2).into_arc();
    let cx = request_context(mock.clone());
    let mut session = single_block_session();

    assert_eq!(session.upload_next(&cx).await.unwrap(), Some(4));
    assert_eq!(session.upload_next(&cx).await.unwrap(), Some(4));
    session.upload_next(&cx).await.unwrap_err();

    assert_eq!(mock.calls().len(), 3);
    assert!(session.into_result().is_none());
}

#[tokio::test]
async fn test_cancel_flag_blocks_next_request() {
    let mock = MockTransport::new().into_arc();
    let cx = request_context(mock.clone());
    let mut session = single_block_session();

    cx.request_cancel();
    let err = session.upload_next(&cx).await.unwrap_err();
    assert!(matches!(err, UploadError::Cancelled));
    assert!(mock.calls().is_empty());
    assert_eq!(session.remaining(), 3);
    assert!(session.into_result().is_none());
}

#[tokio::test]
async fn test_session_for_single_chunk_block() {
    let mock = MockTransport::new().into_arc();
    let cx = request_context(mock.clone());
    let data = patterned_bytes(3, 3);
    let block = split_blocks(&data, 3).unwrap().remove(0);
    let mut session = BlockSession::new(&block, 4).unwrap();

    assert_eq!(session.block_index(), 0);
    assert_eq!(session.upload_next(&cx).await.unwrap(), Some(3));
    assert_eq!(session.upload_next(&cx).await.unwrap(), None);

    let result = session.into_result().unwrap();
    assert_eq!(result.ctx, ctx_for(0, 0));
    assert_eq!(mock.calls().len(), 1);
}
