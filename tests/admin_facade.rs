//! Integration tests for the admin facade: boundary error translation and
//! reconcile-before-listing behavior.

use arena_admin::admin::{AdminError, AdminOps};
use arena_admin::db::MemoryStore;
use arena_admin::tournament::{GameCategory, TournamentDraft, TournamentPatch, TournamentStatus};
use std::sync::Arc;

fn ops() -> AdminOps {
    AdminOps::new(Arc::new(MemoryStore::new()))
}

fn draft(scheduled_at: &str) -> TournamentDraft {
    TournamentDraft {
        game_name: "Weekend Cup".to_string(),
        category: GameCategory::FreeFire,
        scheduled_at: scheduled_at.to_string(),
        entry_fee: 2000,
        prize_pool: 150_000,
        max_participants: 48,
        match_details: String::new(),
        rules: String::new(),
    }
}

#[tokio::test]
async fn test_full_admin_flow() {
    let ops = ops();

    let tournament = ops.create_tournament(draft("2031-06-01T18:00:00Z")).await.unwrap();

    let updated = ops
        .update_tournament(
            tournament.id,
            TournamentPatch {
                prize_pool: Some(250_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.prize_pool, 250_000);

    let with_result = ops
        .attach_tournament_result(tournament.id, "https://cdn.example/r.png".to_string())
        .await
        .unwrap();
    assert_eq!(with_result.result_image.as_deref(), Some("https://cdn.example/r.png"));

    ops.delete_tournament(tournament.id).await.unwrap();
    assert!(ops.list_tournaments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_reconciles_stale_status_first() {
    let ops = ops();

    // Created upcoming, then rescheduled into the past; the stored status is
    // stale until the next reconciliation, which listing runs implicitly.
    let tournament = ops.create_tournament(draft("2031-06-01T18:00:00Z")).await.unwrap();
    assert_eq!(tournament.status, TournamentStatus::Upcoming);

    ops.update_tournament(
        tournament.id,
        TournamentPatch {
            scheduled_at: Some("2020-01-01T18:00:00Z".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let listed = ops.list_tournaments().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, TournamentStatus::Live);
}

#[tokio::test]
async fn test_error_translation_at_the_boundary() {
    let ops = ops();

    let missing = ops
        .update_tournament(uuid::Uuid::new_v4(), TournamentPatch::default())
        .await;
    assert!(matches!(missing, Err(AdminError::NotFound(_))));

    let mut bad = draft("2031-06-01T18:00:00Z");
    bad.max_participants = 0;
    assert!(matches!(
        ops.create_tournament(bad).await,
        Err(AdminError::Validation(_))
    ));

    assert!(matches!(
        ops.credit_user_wallet("u1", 0, "k1").await,
        Err(AdminError::InvalidAmount(0))
    ));
}

#[tokio::test]
async fn test_wallet_reads_through_facade() {
    let ops = ops();

    assert_eq!(ops.wallet_balance("u1").await.unwrap(), 0);

    ops.credit_user_wallet("u1", 500, "k1").await.unwrap();
    ops.credit_user_wallet("u1", 500, "k1").await.unwrap();
    ops.credit_user_wallet("u1", 200, "k2").await.unwrap();

    assert_eq!(ops.wallet_balance("u1").await.unwrap(), 700);

    let entries = ops.wallet_entries("u1", 10).await.unwrap();
    assert_eq!(entries.len(), 2, "The retried credit left no extra entry");
}
