//! Dispatch paths: pinned routed calls, fallback resolution, and verbatim
//! payload relay in both directions.

#![cfg(test)]

use super::{deploy_with, target, ADMIN, USER};
use crate::modules::{CallerProbeModule, EchoModule, RevertingModule, ValueProbeModule};
use std::sync::Arc;
use uuid::Uuid;
use version_router::prelude::*;

// =============================================================================
// ROUTED (PINNED) CALLS
// =============================================================================

#[tokio::test]
async fn pinned_call_reaches_pinned_version() {
    let router = deploy_with(vec![
        (target(1), Arc::new(EchoModule)),
        (target(2), Arc::new(RevertingModule)),
    ])
    .await;
    let v1 = VersionId::from_tag("v1");
    let v2 = VersionId::from_tag("v2");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();
    router.service.register_version(ADMIN, v2, target(2)).await.unwrap();

    // v2 is not the default; pinning still reaches it
    let err = router
        .service
        .execute_at_version(USER, v2, Bytes::from_slice(&[0x01]), U256::zero())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::TargetReverted(Bytes::from_slice(&[0x01])));

    // And the default keeps working independently
    let output = router
        .service
        .execute_at_version(USER, v1, Bytes::from_slice(&[0x02]), U256::zero())
        .await
        .unwrap();
    assert_eq!(output.as_slice(), &[0x02]);
}

#[tokio::test]
async fn pinned_call_to_unknown_version_fails() {
    let router = deploy_with(vec![]).await;
    let ghost = VersionId::from_tag("ghost");

    let err = router
        .service
        .execute_at_version(USER, ghost, Bytes::new(), U256::zero())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::VersionNotFound(ghost));
}

#[tokio::test]
async fn module_observes_original_caller() {
    let router = deploy_with(vec![(target(1), Arc::new(CallerProbeModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    let output = router
        .service
        .execute_at_version(USER, v1, Bytes::new(), U256::zero())
        .await
        .unwrap();

    // Delegate semantics: the module sees USER, not the router
    assert_eq!(Address::from_slice(output.as_slice()).unwrap(), USER);
}

#[tokio::test]
async fn module_observes_attached_value() {
    let router = deploy_with(vec![(target(1), Arc::new(ValueProbeModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    let output = router
        .service
        .execute_at_version(USER, v1, Bytes::new(), U256::from(7777))
        .await
        .unwrap();

    let observed = SlotValue::new(output.as_slice().try_into().unwrap()).to_u256();
    assert_eq!(observed, U256::from(7777));
}

// =============================================================================
// FALLBACK PATH
// =============================================================================

#[tokio::test]
async fn fallback_forwards_entire_input_to_default() {
    let router = deploy_with(vec![(target(1), Arc::new(EchoModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    let input = Bytes::from_vec((0u8..64).collect());
    let relay = router
        .service
        .fallback(USER, input.clone(), U256::zero())
        .await
        .unwrap();

    assert!(relay.success);
    assert_eq!(relay.payload, input);
}

#[tokio::test]
async fn fallback_relays_revert_as_failed_outcome() {
    let router = deploy_with(vec![(target(1), Arc::new(RevertingModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    let relay = router
        .service
        .fallback(USER, Bytes::from_slice(&[0xDE, 0xAD]), U256::zero())
        .await
        .unwrap();

    // A target revert is a relayed outcome, not a router error
    assert!(!relay.success);
    assert_eq!(relay.payload.as_slice(), &[0xDE, 0xAD]);
}

#[tokio::test]
async fn fallback_without_default_is_a_router_error() {
    let router = deploy_with(vec![]).await;

    let err = router
        .service
        .fallback(USER, Bytes::from_slice(&[0x01]), U256::zero())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::VersionNotFound(VersionId::UNSET));
}

#[tokio::test]
async fn fallback_follows_default_switch() {
    let router = deploy_with(vec![
        (target(1), Arc::new(EchoModule)),
        (target(2), Arc::new(RevertingModule)),
    ])
    .await;
    let v1 = VersionId::from_tag("v1");
    let v2 = VersionId::from_tag("v2");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();
    router.service.register_version(ADMIN, v2, target(2)).await.unwrap();

    let relay = router
        .service
        .fallback(USER, Bytes::from_slice(&[0x01]), U256::zero())
        .await
        .unwrap();
    assert!(relay.success);

    router.service.set_default_version(ADMIN, v2).await.unwrap();

    let relay = router
        .service
        .fallback(USER, Bytes::from_slice(&[0x01]), U256::zero())
        .await
        .unwrap();
    assert!(!relay.success);
}

// =============================================================================
// TRANSPORT HANDLERS & STATS
// =============================================================================

#[tokio::test]
async fn execute_handler_relays_output_and_revert_bytes() {
    let router = deploy_with(vec![
        (target(1), Arc::new(EchoModule)),
        (target(2), Arc::new(RevertingModule)),
    ])
    .await;
    let v1 = VersionId::from_tag("v1");
    let v2 = VersionId::from_tag("v2");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();
    router.service.register_version(ADMIN, v2, target(2)).await.unwrap();

    let response = router
        .service
        .handle_execute_at_version(
            USER,
            Uuid::new_v4(),
            ExecuteAtVersionRequestPayload {
                version: v1,
                payload: Bytes::from_slice(&[0xAA]),
                value: U256::zero(),
            },
        )
        .await;
    assert!(response.success);
    assert_eq!(response.output.as_slice(), &[0xAA]);

    let response = router
        .service
        .handle_execute_at_version(
            USER,
            Uuid::new_v4(),
            ExecuteAtVersionRequestPayload {
                version: v2,
                payload: Bytes::from_slice(&[0xBB]),
                value: U256::zero(),
            },
        )
        .await;
    assert!(!response.success);
    assert_eq!(response.output.as_slice(), &[0xBB]);
}

#[tokio::test]
async fn raw_call_handler_mirrors_fallback() {
    let router = deploy_with(vec![(target(1), Arc::new(EchoModule))]).await;
    let v1 = VersionId::from_tag("v1");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();

    let response = router
        .service
        .handle_raw_call(
            USER,
            Uuid::new_v4(),
            RawCallRequestPayload {
                input: Bytes::from_slice(&[0x0F]),
                value: U256::zero(),
            },
        )
        .await;
    assert!(response.success);
    assert_eq!(response.output.as_slice(), &[0x0F]);
}

#[tokio::test]
async fn dispatch_stats_count_outcomes() {
    let router = deploy_with(vec![
        (target(1), Arc::new(EchoModule)),
        (target(2), Arc::new(RevertingModule)),
    ])
    .await;
    let v1 = VersionId::from_tag("v1");
    let v2 = VersionId::from_tag("v2");
    router.service.register_version(ADMIN, v1, target(1)).await.unwrap();
    router.service.register_version(ADMIN, v2, target(2)).await.unwrap();

    let _ = router
        .service
        .execute_at_version(USER, v1, Bytes::new(), U256::zero())
        .await;
    let _ = router
        .service
        .execute_at_version(USER, v2, Bytes::from_slice(&[1]), U256::zero())
        .await;
    let _ = router
        .service
        .fallback(USER, Bytes::new(), U256::zero())
        .await;

    let stats = router.service.stats().await;
    assert_eq!(stats.calls_forwarded, 3);
    assert_eq!(stats.successful_calls, 2);
    assert_eq!(stats.failed_calls, 1);
}
