use std::collections::HashSet;
use std::sync::Arc;

use bytes::BytesMut;
use stonemeta::request::{ApiRequest, ApiResponse, ErrorCode, GetOffsetsRequest};
use stonemeta::topic::TopicDefaults;
use stonemeta::{ControllerRole, GetOffsetInfo, InMemoryBatchStore, KvStore, MetaServer};
use tempfile::tempdir;

fn open(path: &std::path::Path, batch_store: Arc<InMemoryBatchStore>) -> MetaServer {
    MetaServer::with_parts(
        KvStore::open(path).unwrap(),
        TopicDefaults::default(),
        ControllerRole::new(0, true),
        batch_store,
    )
    .unwrap()
}

#[test]
fn restart_resumes_after_last_stored_offset() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("meta.json");
    let batch_store = Arc::new(InMemoryBatchStore::new());

    let (topic_id, other_id) = {
        let server = open(&db, batch_store.clone());
        let topic = server
            .topic_meta_store()
            .create_topic("events", 3, &[])
            .unwrap();
        let other = server
            .topic_meta_store()
            .create_topic("other", 1, &[])
            .unwrap();
        server
            .write_batch(topic.id, 0, BytesMut::from(&b"a"[..]), 10)
            .unwrap();
        server
            .write_batch(topic.id, 0, BytesMut::from(&b"b"[..]), 5)
            .unwrap();
        server
            .write_batch(topic.id, 2, BytesMut::from(&b"c"[..]), 1)
            .unwrap();
        (topic.id, other.id)
    };

    let server = open(&db, batch_store);
    assert!(server.offsets_cache().is_started());
    let offsets = server
        .offsets_cache()
        .get_offsets(&[
            GetOffsetInfo {
                topic_id,
                partition_id: 0,
                num_offsets: 1,
            },
            GetOffsetInfo {
                topic_id,
                partition_id: 1,
                num_offsets: 1,
            },
            GetOffsetInfo {
                topic_id,
                partition_id: 2,
                num_offsets: 1,
            },
            GetOffsetInfo {
                topic_id: other_id,
                partition_id: 0,
                num_offsets: 1,
            },
        ])
        .unwrap();
    assert_eq!(offsets, vec![15, 0, 1, 0]);

    // ids are not reused after a restart
    let next = server
        .topic_meta_store()
        .create_topic("after-restart", 1, &[])
        .unwrap();
    assert!(next.id > other_id);
}

#[test]
fn deleted_topic_stays_deleted_after_restart() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("meta.json");
    let batch_store = Arc::new(InMemoryBatchStore::new());
    let deleted_id = {
        let server = open(&db, batch_store.clone());
        let topic = server
            .topic_meta_store()
            .create_topic("gone", 1, &[])
            .unwrap();
        server.topic_meta_store().delete_topic("gone").unwrap();
        topic.id
    };
    let server = open(&db, batch_store);
    assert!(server.topic_meta_store().get_topic_info("gone").is_none());
    let recreated = server
        .topic_meta_store()
        .create_topic("gone", 1, &[])
        .unwrap();
    assert_ne!(recreated.id, deleted_id);
}

#[tokio::test]
async fn concurrent_get_offsets_are_disjoint() {
    let server = Arc::new(MetaServer::in_memory().unwrap());
    let topic_id = server
        .topic_meta_store()
        .create_topic("hot", 1, &[])
        .unwrap()
        .id;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let server = server.clone();
        tasks.push(tokio::spawn(async move {
            let mut ranges = Vec::new();
            for round in 0..50 {
                let n = 1 + (i + round) % 5;
                let request = GetOffsetsRequest {
                    infos: vec![GetOffsetInfo {
                        topic_id,
                        partition_id: 0,
                        num_offsets: n,
                    }],
                };
                match server.process_request(ApiRequest::GetOffsets(request)).await {
                    ApiResponse::GetOffsets(response) => {
                        assert_eq!(response.error_code, ErrorCode::None as i16);
                        ranges.push((response.offsets[0], n as i64));
                    }
                    other => panic!("unexpected response {:?}", other),
                }
            }
            ranges
        }));
    }

    let mut ranges = Vec::new();
    for task in tasks {
        ranges.extend(task.await.unwrap());
    }
    ranges.sort();
    let mut next = 0;
    let mut bases = HashSet::new();
    for (base, n) in ranges {
        assert_eq!(base, next);
        assert!(bases.insert(base));
        next += n;
    }
}
