//! Edge cases: the zero-identifier quirk, vanished targets, empty payloads,
//! and concurrent access.

#![cfg(test)]

use super::{deploy_with, target, ADMIN, USER};
use crate::modules::{counter_slot, CounterV1, EchoModule, RevertingModule};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;
use version_router::prelude::*;

// =============================================================================
// ZERO IDENTIFIER QUIRK
// =============================================================================

#[tokio::test]
async fn zero_identifier_never_becomes_an_effective_default() {
    let router = deploy_with(vec![
        (target(1), Arc::new(EchoModule)),
        (target(2), Arc::new(CounterV1)),
    ])
    .await;

    // Registering the reserved zero identifier is permitted
    router
        .service
        .register_version(ADMIN, VersionId::UNSET, target(1))
        .await
        .unwrap();

    // ...but the default still reads as unset, so fallback cannot resolve
    assert!(router.service.get_default_version().await.is_unset());
    let err = router
        .service
        .fallback(USER, Bytes::new(), U256::zero())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::VersionNotFound(VersionId::UNSET));

    // No default means nothing to mirror: the interop slot stays zero and
    // stays consistent with the registry, and no default-change event fires
    let mirrored = router.service.mirrored_implementation().await.unwrap();
    assert!(mirrored.is_zero());
    assert!(check_mirror_sync(
        &router.service.registry_snapshot().await,
        mirrored
    ));
    assert_eq!(
        router.events.events(),
        vec![RouterEvent::VersionRegistered {
            version: VersionId::UNSET,
            target: target(1),
        }]
    );

    // Pinning the zero identifier works; it is a real mapping
    let output = router
        .service
        .execute_at_version(USER, VersionId::UNSET, Bytes::from_slice(&[0x01]), U256::zero())
        .await
        .unwrap();
    assert_eq!(output.as_slice(), &[0x01]);

    // The next registration claims the default instead, and only then do
    // the mirror slot and the default-change event follow
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(2)).await.unwrap();
    assert_eq!(router.service.get_default_version().await, v1);

    let mirrored = router.service.mirrored_implementation().await.unwrap();
    assert_eq!(mirrored.to_address(), target(2));
    assert!(check_mirror_sync(
        &router.service.registry_snapshot().await,
        mirrored
    ));
    assert!(router.events.events().contains(&RouterEvent::DefaultVersionChanged {
        old_version: VersionId::UNSET,
        new_version: v1,
    }));
}

// =============================================================================
// VANISHED TARGETS
// =============================================================================

#[tokio::test]
async fn vanished_target_fails_both_dispatch_paths() {
    let router = deploy_with(vec![(target(1), Arc::new(EchoModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    // Code disappears out from under the registration
    router.modules.remove_code(target(1));

    let err = router
        .service
        .execute_at_version(USER, v1, Bytes::new(), U256::zero())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::VersionNotFound(v1));

    let err = router
        .service
        .fallback(USER, Bytes::new(), U256::zero())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::VersionNotFound(v1));

    // The registry entry itself is untouched
    assert_eq!(router.service.get_implementation(v1).await.unwrap(), target(1));
}

#[tokio::test]
async fn raw_call_handler_reports_resolution_failure() {
    let router = deploy_with(vec![]).await;

    let response = router
        .service
        .handle_raw_call(
            USER,
            Uuid::new_v4(),
            RawCallRequestPayload {
                input: Bytes::from_slice(&[0x01]),
                value: U256::zero(),
            },
        )
        .await;

    assert!(!response.success);
    let text = String::from_utf8(response.output.into_vec()).unwrap();
    assert!(text.contains("not found"));
}

// =============================================================================
// EMPTY PAYLOADS
// =============================================================================

#[tokio::test]
async fn empty_input_still_routes_through_fallback() {
    let router = deploy_with(vec![(target(1), Arc::new(EchoModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    let relay = router
        .service
        .fallback(USER, Bytes::new(), U256::zero())
        .await
        .unwrap();
    assert!(relay.success);
    assert!(relay.payload.is_empty());
}

#[tokio::test]
async fn payloadless_revert_degrades_to_call_failed() {
    let router = deploy_with(vec![(target(1), Arc::new(RevertingModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    // Echo-revert with empty input: no payload to carry
    let err = router
        .service
        .execute_at_version(USER, v1, Bytes::new(), U256::zero())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::CallFailed);
}

// =============================================================================
// CONCURRENCY
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_calls_serialize_against_mutations() {
    let router = deploy_with(vec![(target(1), Arc::new(CounterV1))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    let service = Arc::new(router.service);
    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .execute_at_version(USER, v1, Bytes::new(), U256::zero())
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Every increment committed
    let held = service.storage().peek(counter_slot()).to_u256();
    assert_eq!(held, U256::from(16));

    let stats = service.stats().await;
    assert_eq!(stats.calls_forwarded, 16);
    assert_eq!(stats.successful_calls, 16);
}

// =============================================================================
// RANDOMIZED CHURN
// =============================================================================

#[tokio::test]
async fn randomized_register_remove_churn_keeps_registry_consistent() {
    let mut rng = rand::thread_rng();
    let router = deploy_with(
        (1..=8).map(|n| (target(n), Arc::new(EchoModule) as _)).collect(),
    )
    .await;

    let mut live: Vec<VersionId> = Vec::new();
    for round in 0..50u32 {
        if live.is_empty() || rng.gen_bool(0.6) {
            let mut id = [0u8; 32];
            rng.fill(&mut id);
            let version = VersionId::new(id);
            let tgt = target(rng.gen_range(1..=8));
            if router
                .service
                .register_version(ADMIN, version, tgt)
                .await
                .is_ok()
            {
                live.push(version);
            }
        } else {
            let victim = *live.choose(&mut rng).unwrap();
            match router.service.remove_version(ADMIN, victim).await {
                Ok(()) => live.retain(|v| *v != victim),
                // Only the default refuses removal
                Err(err) => assert_eq!(err, RouterError::CannotRemoveDefaultVersion),
            }
        }

        let registry = router.service.registry_snapshot().await;
        assert!(
            check_all(&registry).is_valid(),
            "registry inconsistent after round {round}"
        );
        let mirrored = router.service.mirrored_implementation().await.unwrap();
        assert!(
            check_mirror_sync(&registry, mirrored),
            "mirror slot out of sync after round {round}"
        );
    }

    let listed = router.service.get_versions().await;
    assert_eq!(listed.len(), live.len());
}
