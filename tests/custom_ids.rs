//! Custom Id Tests
//!
//! Custom ids are reject-if-exists:
//! - a live document keeps its id
//! - concurrent uploads to one id have exactly one winner
//! - new content goes through update_content, one commit per revision

mod support;

use std::sync::Arc;

use chrono::{Duration, Utc};

use docgate::document::{DocumentError, DocumentId, DocumentPolicy, MetadataStore, NewDocument};
use docgate::owner::OwnerId;
use support::Harness;

fn text(content: &str) -> NewDocument {
    NewDocument::new("text/plain", content.as_bytes().to_vec())
}

#[tokio::test]
async fn test_invalid_custom_ids_are_rejected() {
    for id in ["", "../escape", "a/b", "-x", " spaced"] {
        assert!(matches!(
            DocumentId::custom(id),
            Err(DocumentError::InvalidId(_))
        ));
    }
}

#[tokio::test]
async fn test_live_custom_id_cannot_be_overwritten() {
    let h = Harness::new();
    let owner = OwnerId::new("u1");
    let id = DocumentId::custom("vedlegg-1").unwrap();

    h.service
        .upload_with_custom_id(&owner, id.clone(), text("first"), None)
        .await
        .unwrap();

    // Neither the owner nor anyone else can replace it by uploading again
    for uploader in [owner.clone(), OwnerId::new("u2")] {
        let err = h
            .service
            .upload_with_custom_id(&uploader, id.clone(), text("second"), None)
            .await
            .unwrap_err();
        assert_eq!(err, DocumentError::AlreadyExists("vedlegg-1".to_string()));
        assert_eq!(err.status_code(), 409);
    }

    let downloaded = h.service.download(&owner, &id).await.unwrap();
    assert_eq!(downloaded.content, b"first");
    assert_eq!(h.storage.put_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_id_uploads_have_one_winner() {
    let h = Harness::new();

    for round in 0..20 {
        let id = DocumentId::custom(format!("race-{}", round)).unwrap();

        let mut tasks = Vec::new();
        for contender in 0..4 {
            let service = Arc::clone(&h.service);
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                let owner = OwnerId::new(format!("owner-{}", contender));
                service
                    .upload_with_custom_id(&owner, id, text(&format!("from {}", contender)), None)
                    .await
                    .map(|doc| doc.owner)
            }));
        }

        let mut winners = Vec::new();
        for task in tasks {
            match task.await.unwrap() {
                Ok(owner) => winners.push(owner),
                Err(DocumentError::AlreadyExists(_)) => {}
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(winners.len(), 1, "round {}", round);

        // The stored document belongs to the winner and is readable by them
        let record = h.metadata.get(&id).unwrap().unwrap();
        assert_eq!(record.owner, winners[0]);
        h.service.download(&winners[0], &id).await.unwrap();
    }

    // Losers' blobs were removed
    assert_eq!(h.storage.blob_count(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_form_one_chain() {
    let h = Harness::new();
    let owner = OwnerId::new("u1");
    let doc = h.service.upload(&owner, text("v1")).await.unwrap();

    let mut tasks = Vec::new();
    for n in 0..4 {
        let service = Arc::clone(&h.service);
        let owner = owner.clone();
        let id = doc.id.clone();
        tasks.push(tokio::spawn(async move {
            service
                .update_content(&owner, &id, text(&format!("v2 from {}", n)))
                .await
        }));
    }

    let mut versions = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            Ok(updated) => versions.push(updated.version),
            Err(DocumentError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    // Commits form one chain: no two writers produced the same version
    let commits = versions.len();
    assert!(commits >= 1);
    versions.sort_unstable();
    versions.dedup();
    assert_eq!(versions.len(), commits);

    let record = h.metadata.get(&doc.id).unwrap().unwrap();
    assert_eq!(record.version, 1 + commits as u64);
    assert_eq!(h.storage.blob_count(), 1);
}

#[tokio::test]
async fn test_caller_expiry_must_be_in_the_future() {
    let h = Harness::builder()
        .policy(DocumentPolicy {
            allow_caller_expiry: true,
            ..DocumentPolicy::default()
        })
        .build();

    let err = h
        .service
        .upload_with_custom_id(
            &OwnerId::new("u1"),
            DocumentId::custom("late").unwrap(),
            text("x"),
            Some(Utc::now() - Duration::minutes(5)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentError::InvalidExpiry(_)));
    assert!(h.storage.calls().is_empty());
}
